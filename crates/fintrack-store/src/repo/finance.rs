use super::columns::{
    date_text, get_date, get_enum, get_opt_date, get_opt_timestamp, get_timestamp, millis,
    opt_date_text, opt_millis,
};
use super::TableRecord;
use fintrack_core::model::{
    BudgetRecord, CategoryRecord, EntityKind, GoalRecord, RecurringTransactionRecord,
    TransactionRecord,
};
use rusqlite::types::Value;
use rusqlite::Row;

impl TableRecord for CategoryRecord {
    const KIND: EntityKind = EntityKind::Categories;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "category_type",
        "icon",
        "color",
        "is_default",
        "user_id",
        "created_at",
    ];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category_type: get_enum(row, 2)?,
            icon: row.get(3)?,
            color: row.get(4)?,
            is_default: row.get(5)?,
            user_id: row.get(6)?,
            created_at: get_timestamp(row, 7)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.name.clone().into(),
            self.category_type.as_str().to_string().into(),
            self.icon.clone().into(),
            self.color.clone().into(),
            self.is_default.into(),
            self.user_id.clone().into(),
            millis(&self.created_at).into(),
        ]
    }
}

impl TableRecord for BudgetRecord {
    const KIND: EntityKind = EntityKind::Budgets;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "category_id",
        "amount_cents",
        "period",
        "start_date",
        "end_date",
        "created_at",
    ];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            amount_cents: row.get(3)?,
            period: get_enum(row, 4)?,
            start_date: get_date(row, 5)?,
            end_date: get_opt_date(row, 6)?,
            created_at: get_timestamp(row, 7)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.user_id.clone().into(),
            self.category_id.into(),
            self.amount_cents.into(),
            self.period.as_str().to_string().into(),
            date_text(&self.start_date).into(),
            opt_date_text(&self.end_date).into(),
            millis(&self.created_at).into(),
        ]
    }
}

impl TableRecord for GoalRecord {
    const KIND: EntityKind = EntityKind::Goals;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "category_id",
        "name",
        "target_amount_cents",
        "current_amount_cents",
        "deadline",
        "status",
        "created_at",
    ];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            name: row.get(3)?,
            target_amount_cents: row.get(4)?,
            current_amount_cents: row.get(5)?,
            deadline: get_opt_date(row, 6)?,
            status: get_enum(row, 7)?,
            created_at: get_timestamp(row, 8)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.user_id.clone().into(),
            self.category_id.into(),
            self.name.clone().into(),
            self.target_amount_cents.into(),
            self.current_amount_cents.into(),
            opt_date_text(&self.deadline).into(),
            self.status.as_str().to_string().into(),
            millis(&self.created_at).into(),
        ]
    }
}

impl TableRecord for RecurringTransactionRecord {
    const KIND: EntityKind = EntityKind::RecurringTransactions;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "category_id",
        "amount_cents",
        "transaction_type",
        "description",
        "frequency",
        "day_of_month",
        "start_date",
        "end_date",
        "next_occurrence",
        "is_active",
        "created_at",
    ];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            amount_cents: row.get(3)?,
            transaction_type: get_enum(row, 4)?,
            description: row.get(5)?,
            frequency: get_enum(row, 6)?,
            day_of_month: row.get(7)?,
            start_date: get_date(row, 8)?,
            end_date: get_opt_date(row, 9)?,
            next_occurrence: get_date(row, 10)?,
            is_active: row.get(11)?,
            created_at: get_timestamp(row, 12)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.user_id.clone().into(),
            self.category_id.into(),
            self.amount_cents.into(),
            self.transaction_type.as_str().to_string().into(),
            self.description.clone().into(),
            self.frequency.as_str().to_string().into(),
            self.day_of_month.into(),
            date_text(&self.start_date).into(),
            opt_date_text(&self.end_date).into(),
            date_text(&self.next_occurrence).into(),
            self.is_active.into(),
            millis(&self.created_at).into(),
        ]
    }
}

impl TableRecord for TransactionRecord {
    const KIND: EntityKind = EntityKind::Transactions;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "category_id",
        "amount_cents",
        "transaction_type",
        "description",
        "date",
        "notes",
        "recurring_transaction_id",
        "created_at",
        "updated_at",
    ];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            amount_cents: row.get(3)?,
            transaction_type: get_enum(row, 4)?,
            description: row.get(5)?,
            date: get_date(row, 6)?,
            notes: row.get(7)?,
            recurring_transaction_id: row.get(8)?,
            created_at: get_timestamp(row, 9)?,
            updated_at: get_opt_timestamp(row, 10)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.user_id.clone().into(),
            self.category_id.into(),
            self.amount_cents.into(),
            self.transaction_type.as_str().to_string().into(),
            self.description.clone().into(),
            date_text(&self.date).into(),
            self.notes.clone().into(),
            self.recurring_transaction_id.into(),
            millis(&self.created_at).into(),
            opt_millis(&self.updated_at).into(),
        ]
    }
}
