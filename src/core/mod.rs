//! Core building blocks of a machine graph.
//!
//! This module contains the leaf types the machine is assembled from:
//! - Conditions (guards) and the attempt-counting gates used by retries
//! - Transitions with ordered, short-circuiting guard conjunctions
//! - States, their edges and hooks
//! - The read-only [`Tick`] view guards are evaluated against
//! - Status codes and the bounded transition history

mod attempts;
mod condition;
mod history;
mod identifier;
mod state;
mod status;
mod tick;
mod transition;

pub use attempts::{AttemptCounter, AttemptsExhausted, AttemptsRemaining, ResetAttempts};
pub use condition::{Always, Condition, Countdown, Never, Not, Predicate};
pub use history::{TransitionLog, TransitionRecord};
pub use identifier::Identifier;
pub use state::{Edge, NoHooks, State, StateHooks, StateId, StateKind, Work};
pub(crate) use state::{log_enter, log_leave};
pub use status::Status;
pub use tick::Tick;
pub use transition::{Binding, GuardOutcome, LogOnce, Transition, TransitionId};
