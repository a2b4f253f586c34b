use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

text_enum!(TransactionType {
    Income => "income",
    Expense => "expense",
});

/// Satu baris buku kas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: TransactionType,
    pub category: String,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: Option<String>,
    pub amount: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: i64,
    pub kind: TransactionType,
    pub category: String,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub id: Option<Uuid>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FinancialSummary {
    pub total_income: i64,
    pub total_expense: i64,
    pub balance: i64,
    pub transaction_count: i64,
}

impl FinancialSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = FinancialSummary::default();
        for entry in entries {
            match entry.kind {
                TransactionType::Income => summary.total_income += entry.amount,
                TransactionType::Expense => summary.total_expense += entry.amount,
            }
            summary.transaction_count += 1;
        }
        summary.balance = summary.total_income - summary.total_expense;
        summary
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub category: Option<String>,
}
