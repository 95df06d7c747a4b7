//! One tick of the machine: entry, work, selection, exit.

use super::Machine;
use crate::config::Verbosity;
use crate::core::{
    log_enter, log_leave, State, StateId, StateKind, Status, Tick, Transition, TransitionRecord,
};
use chrono::Utc;

impl<C> Machine<C> {
    /// Advance the machine by one tick and return its status.
    ///
    /// A state change decided on this tick is logged as a leave now; the
    /// destination's entry handling runs at the start of the next tick,
    /// right before its first work call. A [reentering](Transition::reentering)
    /// transition back to the same state is handled as a state change.
    pub fn step(&mut self) -> Status {
        let span = self.span.clone();
        let _entered = span.enter();
        self.tick += 1;

        let reentry = std::mem::take(&mut self.reentry);
        if self.current != self.previous || self.current.is_none() || reentry {
            match self.current {
                Some(state) => self.enter(state),
                None => {
                    self.fault(Status::CurrentStateNone, "current state none", self.previous);
                    if let Some(recovered) = self.recover() {
                        self.enter(recovered);
                    }
                }
            }
        }

        let Some(current) = self.current else {
            return self.status;
        };

        let (next, reenter) = match self.run(current) {
            Some(selected) => (Some(selected.to), selected.reenter),
            None => {
                self.status = Status::Error;
                (None, false)
            }
        };
        self.previous = Some(current);
        self.current = next;
        self.reentry = reenter;

        if self.current != self.previous || reenter {
            match self.previous {
                Some(left) => {
                    self.leave(left);
                    if let Some(next) = self.current {
                        self.record(left, next);
                    }
                }
                None => {
                    self.fault(Status::PreviousStateNone, "previous state none", self.current);
                    self.recover();
                }
            }
        }

        self.status
    }

    /// Run the state's work hook, then select its next state.
    fn run(&mut self, id: StateId) -> Option<Selected> {
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

        states[id.0].hooks.work(context);

        let state = &states[id.0];
        let view = Tick {
            machine,
            state: state.id(),
            tick: *tick,
            status: *status,
            verbosity: *verbosity,
            context,
        };
        select(state, id, transitions, &view)
    }

    fn enter(&mut self, id: StateId) {
        let announce = self.verbosity.allows(Verbosity::Info);
        let state = &self.states[id.0];
        log_enter(state.id(), self.verbosity);
        if let Some(stay) = state.stay() {
            self.transitions[stay.0].arm();
        }

        match state.kind() {
            StateKind::Plain | StateKind::PassThrough => {}
            StateKind::Wait { hold, delay } => {
                rearm(&mut self.transitions[hold.0], *delay, announce);
            }
            StateKind::Retry {
                hold,
                delay,
                attempts,
                ..
            } => {
                let attempt = attempts.begin_attempt();
                if announce {
                    tracing::info!(state = %state.id(), attempt, "Try: {}", attempt);
                }
                rearm(&mut self.transitions[hold.0], *delay, announce);
            }
        }

        self.states[id.0].hooks.on_enter(&mut self.context);
    }

    fn leave(&mut self, id: StateId) {
        log_leave(self.states[id.0].id(), self.verbosity);
        self.states[id.0].hooks.on_leave(&mut self.context);
    }

    fn fault(&mut self, status: Status, description: &str, trace: Option<StateId>) {
        tracing::error!(status = %status, code = status.code(), "{}", description.to_uppercase());
        self.status = status;
        match trace {
            Some(state) => self.dump(state),
            None => tracing::error!("no state available for a transitions dump"),
        }
    }

    /// Adopt the recovery state, if one is configured.
    fn recover(&mut self) -> Option<StateId> {
        let recovery = self.recovery?;
        if self.verbosity.allows(Verbosity::Info) {
            tracing::info!(state = %self.name_of(recovery), "switching to recovery state");
        }
        self.current = Some(recovery);
        Some(recovery)
    }

    fn record(&mut self, from: StateId, to: StateId) {
        let record = TransitionRecord {
            tick: self.tick,
            from: self.name_of(from).clone(),
            to: self.name_of(to).clone(),
            timestamp: Utc::now(),
        };
        self.history.record(record);
    }
}

/// Outcome of a state's transition selection.
pub(super) struct Selected {
    pub(super) to: StateId,
    /// Leave and re-enter even though `to` is the current state.
    pub(super) reenter: bool,
}

/// Reset a hold edge's countdown and re-arm its log-once flag.
fn rearm<C>(hold: &mut Transition<C>, delay: u32, announce: bool) {
    if announce {
        tracing::info!(transition = %hold.id(), ticks = delay, "waiting for {} ticks", delay);
    }
    hold.reset_conditions();
    hold.arm();
}

/// First satisfied edge in declaration order, then the stay transition.
/// `None` when nothing is satisfied.
pub(super) fn select<C>(
    state: &State<C>,
    own: StateId,
    transitions: &mut [Transition<C>],
    tick: &Tick<'_, C>,
) -> Option<Selected> {
    for edge in state.edges() {
        let transition = &mut transitions[edge.transition.0];
        if transition.follow(tick) {
            return Some(Selected {
                to: edge.to,
                reenter: edge.to == own && transition.reenters(),
            });
        }
    }

    if let Some(stay) = state.stay() {
        if transitions[stay.0].follow(tick) {
            return Some(Selected {
                to: own,
                reenter: false,
            });
        }
    }

    tracing::error!(state = %state.id(), "no transition satisfied");
    None
}
