//! Personal-finance records
//!
//! Money is stored in integer minor units (`*_cents`) so a backup round trip
//! is exact. Calendar dates carry no time zone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Income,
    Expense,
}

text_enum!(TransactionType {
    Income => "income",
    Expense => "expense",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

text_enum!(BudgetPeriod {
    Weekly => "weekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Yearly => "yearly",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalStatus {
    Active,
    Paused,
    Completed,
    Cancelled,
}

text_enum!(GoalStatus {
    Active => "active",
    Paused => "paused",
    Completed => "completed",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

text_enum!(Frequency {
    Daily => "daily",
    Weekly => "weekly",
    BiWeekly => "biWeekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Yearly => "yearly",
});

/// Records whose rows belong to an account
pub trait OwnedByUser {
    /// Owning user id; `None` for shared rows such as built-in categories
    fn owner_id(&self) -> Option<&str>;
}

/// Spending/income category; `user_id` is `None` for built-in categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub category_type: TransactionType,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: String,
    pub category_id: i64,
    pub amount_cents: i64,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    /// Set when the row was generated from a recurring template
    pub recurring_transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub id: i64,
    pub user_id: String,
    pub category_id: i64,
    pub amount_cents: i64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Savings goal, optionally earmarked to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: i64,
    pub user_id: String,
    pub category_id: Option<i64>,
    pub name: String,
    pub target_amount_cents: i64,
    pub current_amount_cents: i64,
    pub deadline: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// Template that materializes transactions on a cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransactionRecord {
    pub id: i64,
    pub user_id: String,
    pub category_id: i64,
    pub amount_cents: i64,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub frequency: Frequency,
    /// 1-31 for monthly templates
    pub day_of_month: Option<u32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_occurrence: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl OwnedByUser for CategoryRecord {
    fn owner_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl OwnedByUser for TransactionRecord {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}

impl OwnedByUser for BudgetRecord {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}

impl OwnedByUser for GoalRecord {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}

impl OwnedByUser for RecurringTransactionRecord {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}
