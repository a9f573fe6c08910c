//! The two mutually exclusive states a balance amount can be in.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// State of a stored balance amount.
///
/// An amount is in exactly one state at a time: spendable (`Available`) or
/// earmarked (`OnHold`). The pair forms part of every persisted balance key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceState {
    Available,
    OnHold,
}

impl BalanceState {
    /// Both states, in key order.
    pub const ALL: [BalanceState; 2] = [BalanceState::Available, BalanceState::OnHold];

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceState::Available => "available",
            BalanceState::OnHold => "on_hold",
        }
    }
}

impl core::fmt::Display for BalanceState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(BalanceState::Available),
            "on_hold" => Ok(BalanceState::OnHold),
            other => Err(DomainError::UnknownBalanceState(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_forms_round_trip() {
        for state in BalanceState::ALL {
            assert_eq!(state.as_str().parse::<BalanceState>().unwrap(), state);
        }
    }

    #[test]
    fn unknown_state_is_rejected() {
        let err = "frozen".parse::<BalanceState>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownBalanceState(_)));
    }
}
