//! Snapshot model
//!
//! A `Snapshot` is the in-memory form of one backup: every backed-up
//! collection as flat records plus a format version, a generation time and a
//! kind tag. It is built fresh for each backup and consumed once by the
//! codec; on restore it is decoded once and dropped after its rows are
//! copied into the live store.

pub mod codec;
pub mod naming;

use crate::errors::SnapshotError;
use crate::model::{
    BudgetRecord, CategoryRecord, EntityCounts, EntityKind, GoalRecord, OwnedByUser,
    RecurringTransactionRecord, RoleClaimRecord, RoleRecord, TransactionRecord, UserClaimRecord,
    UserLoginRecord, UserRecord, UserRoleRecord, UserTokenRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use codec::{decode_snapshot, encode_snapshot, read_snapshot, write_snapshot};
pub use naming::{artifact_file_name, is_artifact_name, parse_artifact_timestamp};

/// Format version written by this build. Compared on restore, never enforced.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Whether identity/auth data travels with the backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotKind {
    /// Identity collections are present and replace the target's accounts
    Full,
    /// Domain collections only; restorable into a store that already has
    /// every referenced account
    DataOnly,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Full => "full",
            SnapshotKind::DataOnly => "dataOnly",
        }
    }

    pub fn includes_identity(&self) -> bool {
        matches!(self, SnapshotKind::Full)
    }
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root artifact document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    /// Absent in artifacts from producers that predate the tag
    #[serde(default)]
    pub kind: Option<SnapshotKind>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub user_roles: Vec<UserRoleRecord>,
    #[serde(default)]
    pub user_claims: Vec<UserClaimRecord>,
    #[serde(default)]
    pub user_logins: Vec<UserLoginRecord>,
    #[serde(default)]
    pub user_tokens: Vec<UserTokenRecord>,
    #[serde(default)]
    pub role_claims: Vec<RoleClaimRecord>,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    #[serde(default)]
    pub budgets: Vec<BudgetRecord>,
    #[serde(default)]
    pub recurring_transactions: Vec<RecurringTransactionRecord>,
}

impl Snapshot {
    /// Empty snapshot stamped with the current format version
    pub fn new(kind: SnapshotKind, generated_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_FORMAT_VERSION,
            generated_at,
            kind: Some(kind),
            users: Vec::new(),
            roles: Vec::new(),
            user_roles: Vec::new(),
            user_claims: Vec::new(),
            user_logins: Vec::new(),
            user_tokens: Vec::new(),
            role_claims: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            goals: Vec::new(),
            budgets: Vec::new(),
            recurring_transactions: Vec::new(),
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Roles => self.roles.len(),
            EntityKind::Users => self.users.len(),
            EntityKind::UserRoles => self.user_roles.len(),
            EntityKind::UserClaims => self.user_claims.len(),
            EntityKind::UserLogins => self.user_logins.len(),
            EntityKind::UserTokens => self.user_tokens.len(),
            EntityKind::RoleClaims => self.role_claims.len(),
            EntityKind::Categories => self.categories.len(),
            EntityKind::Budgets => self.budgets.len(),
            EntityKind::Goals => self.goals.len(),
            EntityKind::RecurringTransactions => self.recurring_transactions.len(),
            EntityKind::Transactions => self.transactions.len(),
        }
    }

    pub fn counts(&self) -> EntityCounts {
        let mut counts = EntityCounts::new();
        for kind in EntityKind::ALL {
            counts.set(kind, self.count(kind));
        }
        counts
    }

    /// True when any identity collection has rows
    pub fn has_identity_data(&self) -> bool {
        EntityKind::ALL
            .iter()
            .filter(|k| k.is_identity())
            .any(|k| self.count(*k) > 0)
    }

    pub fn version_matches(&self) -> bool {
        self.version == SNAPSHOT_FORMAT_VERSION
    }

    /// Decide how a restore treats identity data.
    ///
    /// A tagged snapshot is checked against its tag; an untagged one is
    /// classified from collection emptiness. Inconsistent identity data is
    /// rejected rather than guessed at.
    pub fn classify(&self) -> Result<SnapshotKind, SnapshotError> {
        match self.kind {
            Some(SnapshotKind::Full) => Ok(SnapshotKind::Full),
            Some(SnapshotKind::DataOnly) => {
                if self.has_identity_data() {
                    return Err(SnapshotError::MalformedIdentity {
                        reason: format!(
                            "data-only backup carries identity rows ({})",
                            self.identity_summary()
                        ),
                    });
                }
                Ok(SnapshotKind::DataOnly)
            }
            None => {
                if !self.has_identity_data() {
                    return Ok(SnapshotKind::DataOnly);
                }
                if self.users.is_empty() {
                    return Err(SnapshotError::MalformedIdentity {
                        reason: format!(
                            "identity rows present without any users ({})",
                            self.identity_summary()
                        ),
                    });
                }
                Ok(SnapshotKind::Full)
            }
        }
    }

    /// Distinct non-empty owner ids referenced by the domain collections
    pub fn referenced_user_ids(&self) -> BTreeSet<&str> {
        fn collect<'a, T: OwnedByUser>(rows: &'a [T], into: &mut BTreeSet<&'a str>) {
            into.extend(
                rows.iter()
                    .filter_map(|r| r.owner_id())
                    .filter(|id| !id.trim().is_empty()),
            );
        }

        let mut ids = BTreeSet::new();
        collect(&self.categories, &mut ids);
        collect(&self.budgets, &mut ids);
        collect(&self.goals, &mut ids);
        collect(&self.recurring_transactions, &mut ids);
        collect(&self.transactions, &mut ids);
        ids
    }

    fn identity_summary(&self) -> String {
        EntityKind::ALL
            .iter()
            .filter(|k| k.is_identity())
            .map(|k| format!("{}={}", k, self.count(*k)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
