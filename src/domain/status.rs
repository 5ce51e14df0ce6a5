//! Account status state machine.
//!
//! ```text
//!   ACTIVE --freeze--> FROZEN --unfreeze--> ACTIVE
//!   ACTIVE --close---> CLOSED
//!   FROZEN --close---> CLOSED
//! ```
//!
//! `CLOSED` is terminal. All legality lives in [`allowed`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Frozen,
    Closed,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "ACTIVE"),
            AccountStatus::Frozen => write!(f, "FROZEN"),
            AccountStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

/// An operation gated by the account status.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Transition {
    Debit,
    Freeze,
    Unfreeze,
    Close,
}

impl Transition {
    pub const ALL: [Transition; 4] = [
        Transition::Debit,
        Transition::Freeze,
        Transition::Unfreeze,
        Transition::Close,
    ];

    /// Status the account ends up in after this transition is applied.
    pub fn target(self, from: AccountStatus) -> AccountStatus {
        match self {
            Transition::Debit => from,
            Transition::Freeze => AccountStatus::Frozen,
            Transition::Unfreeze => AccountStatus::Active,
            Transition::Close => AccountStatus::Closed,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Debit => write!(f, "debit"),
            Transition::Freeze => write!(f, "freeze"),
            Transition::Unfreeze => write!(f, "unfreeze"),
            Transition::Close => write!(f, "close"),
        }
    }
}

/// The guard table.
pub fn allowed(transition: Transition, status: AccountStatus) -> bool {
    use AccountStatus::*;
    use Transition::*;

    match (transition, status) {
        (Debit, Active) => true,
        (Debit, Frozen | Closed) => false,
        (Freeze, Active) => true,
        (Freeze, Frozen | Closed) => false,
        (Unfreeze, Frozen) => true,
        (Unfreeze, Active | Closed) => false,
        (Close, Active | Frozen) => true,
        (Close, Closed) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: [AccountStatus; 3] = [
        AccountStatus::Active,
        AccountStatus::Frozen,
        AccountStatus::Closed,
    ];

    #[test]
    fn test_guard_table() {
        let expected = [
            (Transition::Debit, [true, false, false]),
            (Transition::Freeze, [true, false, false]),
            (Transition::Unfreeze, [false, true, false]),
            (Transition::Close, [true, true, false]),
        ];

        for (transition, row) in expected {
            for (status, allow) in STATUSES.iter().zip(row) {
                assert_eq!(
                    allowed(transition, *status),
                    allow,
                    "{transition} from {status}"
                );
            }
        }
    }

    #[test]
    fn test_closed_is_terminal() {
        for transition in Transition::ALL {
            assert!(!allowed(transition, AccountStatus::Closed));
        }
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            Transition::Freeze.target(AccountStatus::Active),
            AccountStatus::Frozen
        );
        assert_eq!(
            Transition::Unfreeze.target(AccountStatus::Frozen),
            AccountStatus::Active
        );
        assert_eq!(
            Transition::Close.target(AccountStatus::Frozen),
            AccountStatus::Closed
        );
        assert_eq!(
            Transition::Debit.target(AccountStatus::Active),
            AccountStatus::Active
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::Frozen).unwrap(),
            "\"FROZEN\""
        );
        let status: AccountStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(status, AccountStatus::Closed);
        assert!(serde_json::from_str::<AccountStatus>("\"SUSPENDED\"").is_err());
    }
}
