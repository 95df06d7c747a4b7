//! Machine status codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a machine as observed after a step.
///
/// Faults never stop the machine; they only move the status away from `Ok`.
/// The status stays where the last fault left it until
/// [`Machine::clear_status`](crate::Machine::clear_status) is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Ok,
    /// A state found no satisfied transition.
    Error,
    /// A tick began without a current state.
    CurrentStateNone,
    /// A state change was observed without a previous state.
    PreviousStateNone,
}

impl Status {
    /// Numeric code for hosts that report status over narrow channels.
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Error => 1,
            Self::CurrentStateNone => 2,
            Self::PreviousStateNone => 3,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
            Self::CurrentStateNone => write!(f, "current state none"),
            Self::PreviousStateNone => write!(f, "previous state none"),
        }
    }
}
