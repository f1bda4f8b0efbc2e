//! Flat entity records carried by backups
//!
//! Every record mirrors one table row: no nested objects, foreign keys are
//! plain identifier fields. JSON field names are camelCase and enums are
//! spelled out as strings, so artifacts stay readable and tolerant of
//! variant reordering.

/// Implements `as_str`, `FromStr` and `Display` for a fieldless enum whose
/// storage text must match its serde name. Defined ahead of the submodules
/// that expand it.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod entity;
pub mod finance;
pub mod identity;

pub use entity::{EntityCounts, EntityKind};
pub use finance::{
    BudgetPeriod, BudgetRecord, CategoryRecord, Frequency, GoalRecord, GoalStatus,
    OwnedByUser, RecurringTransactionRecord, TransactionRecord, TransactionType,
};
pub use identity::{
    RoleClaimRecord, RoleRecord, UserClaimRecord, UserLoginRecord, UserRecord, UserRoleRecord,
    UserTokenRecord,
};
