//! Read-only view of a machine handed to guards during evaluation.

use super::identifier::Identifier;
use super::status::Status;
use crate::config::Verbosity;

/// What a guard can see of the machine while it is being evaluated.
///
/// Guards receive shared access to the application context only; mutation
/// of the context belongs to state hooks, which run before any guard.
pub struct Tick<'a, C> {
    pub(crate) machine: &'a Identifier,
    pub(crate) state: &'a Identifier,
    pub(crate) tick: u64,
    pub(crate) status: Status,
    pub(crate) verbosity: Verbosity,
    pub(crate) context: &'a C,
}

impl<'a, C> Tick<'a, C> {
    /// Build a view outside of a running machine, e.g. to exercise a guard
    /// in isolation.
    pub fn new(machine: &'a Identifier, state: &'a Identifier, context: &'a C) -> Self {
        Tick {
            machine,
            state,
            tick: 0,
            status: Status::Ok,
            verbosity: Verbosity::default(),
            context,
        }
    }

    pub fn machine(&self) -> &Identifier {
        self.machine
    }

    /// The state whose transitions are being evaluated.
    pub fn state(&self) -> &Identifier {
        self.state
    }

    /// Number of the tick in progress, starting at 1.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn context(&self) -> &C {
        self.context
    }

    pub(crate) fn is_verbose(&self) -> bool {
        self.verbosity.allows(Verbosity::Debug)
    }

    pub(crate) fn logs_firings(&self) -> bool {
        self.verbosity.allows(Verbosity::Info)
    }
}
