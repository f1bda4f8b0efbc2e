//! Identity and authorization records
//!
//! Users and roles are keyed by opaque text ids; claims carry integer ids
//! from an auto-increment column. Secrets stay wrapped in [`Sensitive`] so a
//! stray `{:?}` never prints them.

use chrono::{DateTime, Utc};
use fintrack_core_types::Sensitive;
use serde::{Deserialize, Serialize};

/// An account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub user_name: Option<String>,
    pub normalized_user_name: Option<String>,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    pub password_hash: Sensitive<Option<String>>,
    pub security_stamp: Sensitive<Option<String>>,
    pub concurrency_stamp: Option<String>,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub two_factor_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub lockout_enabled: bool,
    pub access_failed_count: i32,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Minimal confirmed account; the remaining fields take their defaults
    pub fn new(id: impl Into<String>, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let email = email.into();
        Self {
            id: id.into(),
            user_name: Some(email.clone()),
            normalized_user_name: Some(email.to_uppercase()),
            normalized_email: Some(email.to_uppercase()),
            email: Some(email),
            email_confirmed: true,
            password_hash: Sensitive::new(None),
            security_stamp: Sensitive::new(None),
            concurrency_stamp: None,
            phone_number: None,
            phone_number_confirmed: false,
            two_factor_enabled: false,
            lockout_end: None,
            lockout_enabled: true,
            access_failed_count: 0,
            display_name: None,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: String,
    pub name: Option<String>,
    pub normalized_name: Option<String>,
    pub concurrency_stamp: Option<String>,
}

/// Membership of a user in a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleRecord {
    pub user_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaimRecord {
    pub id: i64,
    pub user_id: String,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}

/// External login (OAuth provider) linked to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginRecord {
    pub login_provider: String,
    pub provider_key: String,
    pub provider_display_name: Option<String>,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTokenRecord {
    pub user_id: String,
    pub login_provider: String,
    pub name: String,
    pub value: Sensitive<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleClaimRecord {
    pub id: i64,
    pub role_id: String,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}
