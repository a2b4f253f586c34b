use uuid::Uuid;

use super::not_found;
use crate::auth::{Claims, is_bendahara_or_admin, require};
use crate::error::ApiError;
use crate::models::transaction::{
    CreateTransactionRequest, FinancialSummary, NewTransaction, Transaction, TransactionPatch,
    TransactionQuery,
};
use crate::store::Store;
use crate::utils::{required, required_text};

pub async fn list_transactions(
    store: &dyn Store,
    filter: TransactionQuery,
) -> Result<Vec<Transaction>, ApiError> {
    Ok(store.list_transactions(&filter).await?)
}

pub async fn get_transaction(store: &dyn Store, id: Uuid) -> Result<Transaction, ApiError> {
    store.get_transaction(id).await?.ok_or_else(|| not_found("Transaksi", id))
}

pub async fn summary(store: &dyn Store, category: Option<&str>) -> Result<FinancialSummary, ApiError> {
    Ok(store.summarize_transactions(category).await?)
}

pub async fn create_transaction(
    store: &dyn Store,
    claims: &Claims,
    payload: CreateTransactionRequest,
) -> Result<Transaction, ApiError> {
    require(is_bendahara_or_admin(claims))?;

    let amount = required(payload.amount, "amount")?;
    if amount <= 0 {
        return Err(ApiError::Validation("amount harus lebih dari 0".into()));
    }

    let tx = NewTransaction {
        description: required_text(payload.description, "description")?,
        amount,
        kind: required(payload.kind, "type")?,
        category: required_text(payload.category, "category")?,
        date: required(payload.date, "date")?,
        receipt_url: payload.receipt_url,
        created_by: claims.user_id,
    };

    let created = store.insert_transaction(&tx).await?;
    log::info!(
        "Transaksi {} ({} {}) dicatat oleh {}",
        created.id,
        created.kind,
        created.amount,
        claims.email
    );
    Ok(created)
}

pub async fn update_transaction(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    patch: TransactionPatch,
) -> Result<Transaction, ApiError> {
    require(is_bendahara_or_admin(claims))?;
    if patch.amount.is_some_and(|a| a <= 0) {
        return Err(ApiError::Validation("amount harus lebih dari 0".into()));
    }
    store
        .update_transaction(id, &patch)
        .await?
        .ok_or_else(|| not_found("Transaksi", id))
}

pub async fn delete_transaction(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
    require(is_bendahara_or_admin(claims))?;
    store.soft_delete_transaction(id).await?;
    Ok(())
}
