//! Errors raised while assembling a machine.

use crate::core::Identifier;
use thiserror::Error;

/// Wiring mistakes detected by the construction API.
///
/// None of these can happen once the machine is ticking; runtime faults are
/// reported through [`Status`](crate::core::Status) instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("State '{0}' is already registered")]
    DuplicateState(Identifier),

    #[error("State handle {0} does not belong to this machine")]
    UnknownState(usize),

    #[error("Transition handle {0} does not belong to this machine")]
    UnknownTransition(usize),

    #[error("Transition '{transition}' is already bound from '{from}' to '{to}'")]
    AlreadyBound {
        transition: Identifier,
        from: Identifier,
        to: Identifier,
    },

    #[error("State '{0}' already has a stay transition")]
    StayAlreadySet(Identifier),
}
