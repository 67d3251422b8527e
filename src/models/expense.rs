use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Maintenance,
    Cleaning,
    Utilities,
    ManagementFee,
    Tax,
    Insurance,
    Repair,
    Security,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_id: String,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub agency_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Unpaid and past its due date at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, ExpenseStatus::Pending | ExpenseStatus::Overdue)
            && self.due_date.is_some_and(|due| due < now)
    }
}

impl_entity!(Expense, "expense-store");
