//! Topology problems found by validation.

use crate::core::Identifier;
use thiserror::Error;

/// A wiring problem that will surface as a runtime fault if left in place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyIssue {
    #[error("No initial state set")]
    MissingInitialState,

    #[error("State '{state}' has no transitions and no stay transition")]
    DeadEnd { state: Identifier },

    #[error("Transition '{transition}' is registered but bound to no state")]
    UnboundTransition { transition: Identifier },

    #[error("Retry state '{state}' has no outcome transitions")]
    RetryNotWired { state: Identifier },
}
