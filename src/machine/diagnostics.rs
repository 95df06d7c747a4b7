//! Transition dumps emitted when the machine faults.

use super::Machine;
use crate::config::{DiagnosticsMode, Verbosity};
use crate::core::{GuardOutcome, StateId, Tick, TransitionId};

impl<C> Machine<C> {
    /// Log every outgoing transition of `id`, and its stay transition, with
    /// verbosity raised to `Debug` for the duration of the dump.
    ///
    /// In [`DiagnosticsMode::Reevaluate`] the transitions are followed again,
    /// so stateful guards advance and log-once flags may flip exactly as they
    /// would on a real tick.
    pub(super) fn dump(&mut self, id: StateId) {
        let saved = self.verbosity;
        self.verbosity = Verbosity::Debug;

        let state = &self.states[id.0];
        tracing::error!(
            state = %state.id(),
            mode = ?self.diagnostics,
            "-- STARTING state {} transitions dump",
            state.id()
        );

        let mut listed: Vec<TransitionId> = state.edges().iter().map(|e| e.transition).collect();
        listed.extend(state.stay());

        match self.diagnostics {
            DiagnosticsMode::Describe => {
                for handle in listed {
                    let transition = &self.transitions[handle.0];
                    tracing::error!(
                        transition = %transition.id(),
                        result = ?transition.last_result(),
                        guards = %render(&transition.describe()),
                        "-- evaluated: {}",
                        transition.id()
                    );
                }
            }
            DiagnosticsMode::Reevaluate => {
                let Machine {
                    id: machine,
                    states,
                    transitions,
                    context,
                    tick,
                    status,
                    verbosity,
                    ..
                } = self;
                let view = Tick {
                    machine,
                    state: states[id.0].id(),
                    tick: *tick,
                    status: *status,
                    verbosity: *verbosity,
                    context,
                };
                for handle in listed {
                    let transition = &mut transitions[handle.0];
                    let result = transition.follow(&view);
                    tracing::error!(
                        transition = %transition.id(),
                        result,
                        "-- evaluating: {}",
                        transition.id()
                    );
                }
            }
        }

        tracing::error!(state = %self.states[id.0].id(), "-- END of transitions dump");
        self.verbosity = saved;
    }
}

/// `id=true, id=false, id=skipped` for a guard list.
fn render(outcomes: &[GuardOutcome]) -> String {
    outcomes
        .iter()
        .map(|g| {
            let outcome = match g.outcome {
                Some(true) => "true",
                Some(false) => "false",
                None => "skipped",
            };
            format!("{}={}", g.condition, outcome)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
