use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::PgStore;
use crate::models::transaction::{
    FinancialSummary, NewTransaction, Transaction, TransactionPatch, TransactionQuery,
};
use crate::store::{StoreResult, TransactionStore};

#[async_trait]
impl TransactionStore for PgStore {
    async fn list_transactions(&self, filter: &TransactionQuery) -> StoreResult<Vec<Transaction>> {
        let rows = query_as::<_, Transaction>(
            "SELECT t.*, u.name AS created_by_name
             FROM transactions t
             LEFT JOIN users u ON t.created_by = u.id
             WHERE t.deleted_at IS NULL
               AND ($1::TEXT IS NULL OR t.category = $1)
               AND ($2::TEXT IS NULL OR t.type = $2)
             ORDER BY t.date DESC, t.created_at DESC",
        )
        .bind(&filter.category)
        .bind(filter.kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>> {
        let row = query_as::<_, Transaction>(
            "SELECT t.*, u.name AS created_by_name
             FROM transactions t
             LEFT JOIN users u ON t.created_by = u.id
             WHERE t.id = $1 AND t.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_transaction(&self, tx: &NewTransaction) -> StoreResult<Transaction> {
        let row = query_as::<_, Transaction>(
            "WITH t AS (
                INSERT INTO transactions (description, amount, type, category, date, receipt_url, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT t.*, u.name AS created_by_name FROM t LEFT JOIN users u ON t.created_by = u.id",
        )
        .bind(&tx.description)
        .bind(tx.amount)
        .bind(tx.kind.as_str())
        .bind(&tx.category)
        .bind(tx.date)
        .bind(&tx.receipt_url)
        .bind(tx.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> StoreResult<Option<Transaction>> {
        let row = query_as::<_, Transaction>(
            "WITH t AS (
                UPDATE transactions SET
                    description = COALESCE($2, description),
                    amount = COALESCE($3, amount),
                    type = COALESCE($4, type),
                    category = COALESCE($5, category),
                    date = COALESCE($6, date),
                    receipt_url = COALESCE($7, receipt_url),
                    updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
             )
             SELECT t.*, u.name AS created_by_name FROM t LEFT JOIN users u ON t.created_by = u.id",
        )
        .bind(id)
        .bind(&patch.description)
        .bind(patch.amount)
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(&patch.category)
        .bind(patch.date)
        .bind(&patch.receipt_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn soft_delete_transaction(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE transactions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn summarize_transactions(&self, category: Option<&str>) -> StoreResult<FinancialSummary> {
        let summary = query_as::<_, FinancialSummary>(
            "SELECT
                COALESCE(SUM(amount) FILTER (WHERE type = 'income'), 0)::BIGINT AS total_income,
                COALESCE(SUM(amount) FILTER (WHERE type = 'expense'), 0)::BIGINT AS total_expense,
                (COALESCE(SUM(amount) FILTER (WHERE type = 'income'), 0)
                  - COALESCE(SUM(amount) FILTER (WHERE type = 'expense'), 0))::BIGINT AS balance,
                COUNT(*) AS transaction_count
             FROM transactions
             WHERE deleted_at IS NULL
               AND ($1::TEXT IS NULL OR category = $1)",
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}
