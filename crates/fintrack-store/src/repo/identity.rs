use super::columns::{get_opt_timestamp, get_timestamp, millis, opt_millis};
use super::TableRecord;
use fintrack_core::core_types::Sensitive;
use fintrack_core::model::{
    EntityKind, RoleClaimRecord, RoleRecord, UserClaimRecord, UserLoginRecord, UserRecord,
    UserRoleRecord, UserTokenRecord,
};
use rusqlite::types::Value;
use rusqlite::Row;

impl TableRecord for RoleRecord {
    const KIND: EntityKind = EntityKind::Roles;
    const COLUMNS: &'static [&'static str] = &["id", "name", "normalized_name", "concurrency_stamp"];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            normalized_name: row.get(2)?,
            concurrency_stamp: row.get(3)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.clone().into(),
            self.name.clone().into(),
            self.normalized_name.clone().into(),
            self.concurrency_stamp.clone().into(),
        ]
    }
}

impl TableRecord for UserRecord {
    const KIND: EntityKind = EntityKind::Users;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_name",
        "normalized_user_name",
        "email",
        "normalized_email",
        "email_confirmed",
        "password_hash",
        "security_stamp",
        "concurrency_stamp",
        "phone_number",
        "phone_number_confirmed",
        "two_factor_enabled",
        "lockout_end",
        "lockout_enabled",
        "access_failed_count",
        "display_name",
        "created_at",
    ];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_name: row.get(1)?,
            normalized_user_name: row.get(2)?,
            email: row.get(3)?,
            normalized_email: row.get(4)?,
            email_confirmed: row.get(5)?,
            password_hash: Sensitive::new(row.get(6)?),
            security_stamp: Sensitive::new(row.get(7)?),
            concurrency_stamp: row.get(8)?,
            phone_number: row.get(9)?,
            phone_number_confirmed: row.get(10)?,
            two_factor_enabled: row.get(11)?,
            lockout_end: get_opt_timestamp(row, 12)?,
            lockout_enabled: row.get(13)?,
            access_failed_count: row.get(14)?,
            display_name: row.get(15)?,
            created_at: get_timestamp(row, 16)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.clone().into(),
            self.user_name.clone().into(),
            self.normalized_user_name.clone().into(),
            self.email.clone().into(),
            self.normalized_email.clone().into(),
            self.email_confirmed.into(),
            self.password_hash.expose().clone().into(),
            self.security_stamp.expose().clone().into(),
            self.concurrency_stamp.clone().into(),
            self.phone_number.clone().into(),
            self.phone_number_confirmed.into(),
            self.two_factor_enabled.into(),
            opt_millis(&self.lockout_end).into(),
            self.lockout_enabled.into(),
            self.access_failed_count.into(),
            self.display_name.clone().into(),
            millis(&self.created_at).into(),
        ]
    }
}

impl TableRecord for UserRoleRecord {
    const KIND: EntityKind = EntityKind::UserRoles;
    const COLUMNS: &'static [&'static str] = &["user_id", "role_id"];
    const KEY: &'static [&'static str] = &["user_id", "role_id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            role_id: row.get(1)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![self.user_id.clone().into(), self.role_id.clone().into()]
    }
}

impl TableRecord for UserClaimRecord {
    const KIND: EntityKind = EntityKind::UserClaims;
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "claim_type", "claim_value"];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            claim_type: row.get(2)?,
            claim_value: row.get(3)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.user_id.clone().into(),
            self.claim_type.clone().into(),
            self.claim_value.clone().into(),
        ]
    }
}

impl TableRecord for UserLoginRecord {
    const KIND: EntityKind = EntityKind::UserLogins;
    const COLUMNS: &'static [&'static str] = &[
        "login_provider",
        "provider_key",
        "provider_display_name",
        "user_id",
    ];
    const KEY: &'static [&'static str] = &["login_provider", "provider_key"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            login_provider: row.get(0)?,
            provider_key: row.get(1)?,
            provider_display_name: row.get(2)?,
            user_id: row.get(3)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.login_provider.clone().into(),
            self.provider_key.clone().into(),
            self.provider_display_name.clone().into(),
            self.user_id.clone().into(),
        ]
    }
}

impl TableRecord for UserTokenRecord {
    const KIND: EntityKind = EntityKind::UserTokens;
    const COLUMNS: &'static [&'static str] = &["user_id", "login_provider", "name", "value"];
    const KEY: &'static [&'static str] = &["user_id", "login_provider", "name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            login_provider: row.get(1)?,
            name: row.get(2)?,
            value: Sensitive::new(row.get(3)?),
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.user_id.clone().into(),
            self.login_provider.clone().into(),
            self.name.clone().into(),
            self.value.expose().clone().into(),
        ]
    }
}

impl TableRecord for RoleClaimRecord {
    const KIND: EntityKind = EntityKind::RoleClaims;
    const COLUMNS: &'static [&'static str] = &["id", "role_id", "claim_type", "claim_value"];
    const KEY: &'static [&'static str] = &["id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            role_id: row.get(1)?,
            claim_type: row.get(2)?,
            claim_value: row.get(3)?,
        })
    }

    fn to_params(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.role_id.clone().into(),
            self.claim_type.clone().into(),
            self.claim_value.clone().into(),
        ]
    }
}
