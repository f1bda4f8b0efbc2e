//! Entity kinds in dependency order

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One backed-up collection.
///
/// Declaration order is parent-before-child: inserting in this order and
/// deleting in reverse never trips a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Roles,
    Users,
    UserRoles,
    UserClaims,
    UserLogins,
    UserTokens,
    RoleClaims,
    Categories,
    Budgets,
    Goals,
    RecurringTransactions,
    Transactions,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Roles,
        EntityKind::Users,
        EntityKind::UserRoles,
        EntityKind::UserClaims,
        EntityKind::UserLogins,
        EntityKind::UserTokens,
        EntityKind::RoleClaims,
        EntityKind::Categories,
        EntityKind::Budgets,
        EntityKind::Goals,
        EntityKind::RecurringTransactions,
        EntityKind::Transactions,
    ];

    /// Table backing this collection
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Roles => "roles",
            EntityKind::Users => "users",
            EntityKind::UserRoles => "user_roles",
            EntityKind::UserClaims => "user_claims",
            EntityKind::UserLogins => "user_logins",
            EntityKind::UserTokens => "user_tokens",
            EntityKind::RoleClaims => "role_claims",
            EntityKind::Categories => "categories",
            EntityKind::Budgets => "budgets",
            EntityKind::Goals => "goals",
            EntityKind::RecurringTransactions => "recurring_transactions",
            EntityKind::Transactions => "transactions",
        }
    }

    /// Collection key inside the snapshot document
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Roles => "roles",
            EntityKind::Users => "users",
            EntityKind::UserRoles => "userRoles",
            EntityKind::UserClaims => "userClaims",
            EntityKind::UserLogins => "userLogins",
            EntityKind::UserTokens => "userTokens",
            EntityKind::RoleClaims => "roleClaims",
            EntityKind::Categories => "categories",
            EntityKind::Budgets => "budgets",
            EntityKind::Goals => "goals",
            EntityKind::RecurringTransactions => "recurringTransactions",
            EntityKind::Transactions => "transactions",
        }
    }

    /// Identity/auth collections (users, roles and their link tables)
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            EntityKind::Roles
                | EntityKind::Users
                | EntityKind::UserRoles
                | EntityKind::UserClaims
                | EntityKind::UserLogins
                | EntityKind::UserTokens
                | EntityKind::RoleClaims
        )
    }

    /// Insert order for a restore; identity kinds only when they are replaced
    pub fn insert_order(include_identity: bool) -> Vec<EntityKind> {
        Self::ALL
            .into_iter()
            .filter(|k| include_identity || !k.is_identity())
            .collect()
    }

    /// Delete order for a restore (children first)
    pub fn wipe_order(include_identity: bool) -> Vec<EntityKind> {
        let mut order = Self::insert_order(include_identity);
        order.reverse();
        order
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Row count per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts(BTreeMap<EntityKind, usize>);

impl EntityCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: EntityKind, rows: usize) {
        self.0.insert(kind, rows);
    }

    pub fn get(&self, kind: EntityKind) -> usize {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for EntityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, rows) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", kind, rows)?;
            first = false;
        }
        Ok(())
    }
}
