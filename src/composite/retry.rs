use super::hold_transition;
use crate::core::{
    AttemptCounter, AttemptsExhausted, AttemptsRemaining, Condition, Identifier, NoHooks,
    ResetAttempts, StateHooks, StateId, StateKind, Transition, TransitionId,
};
use crate::machine::{AssemblyError, Machine};

/// Handle to a retrying state.
///
/// A retry state waits `delay` ticks after every entry, then routes on the
/// outcome of the attempt the rest of the graph made. Entering the state
/// begins a new attempt; the edges installed by
/// [`set_retry_error_transition`](Self::set_retry_error_transition) send the
/// machine back to retry while attempts remain and to an error state once
/// more than `retries` attempts failed.
///
/// The retry target may be the retry state itself: the `RETRY` edge is
/// [reentering](Transition::reentering), so looping back begins a new
/// attempt and restarts the delay like any other entry.
#[derive(Clone, Debug)]
pub struct Retry {
    state: StateId,
    attempts: AttemptCounter,
    retries: u32,
}

impl Retry {
    /// Register a retry state without hooks.
    pub fn create<C: 'static>(
        machine: &mut Machine<C>,
        id: impl Into<Identifier>,
        delay: u32,
        retries: u32,
    ) -> Result<Self, AssemblyError> {
        Self::create_with_hooks(machine, id, delay, retries, NoHooks)
    }

    /// Register a retry state whose `hooks` run after the built-in entry
    /// handling (attempt count and delay reset).
    pub fn create_with_hooks<C: 'static>(
        machine: &mut Machine<C>,
        id: impl Into<Identifier>,
        delay: u32,
        retries: u32,
        hooks: impl StateHooks<C> + 'static,
    ) -> Result<Self, AssemblyError> {
        let state = machine.add_state_of_kind(id.into(), StateKind::Plain, Box::new(hooks))?;
        let hold = machine.connect(state, state, hold_transition("Waiting", delay))?;
        let attempts = AttemptCounter::new();
        machine.set_state_kind(
            state,
            StateKind::Retry {
                hold,
                delay,
                attempts: attempts.clone(),
                retries,
            },
        )?;
        Ok(Retry {
            state,
            attempts,
            retries,
        })
    }

    /// Handle of the retry state itself.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Counter shared by the state and its outcome gates.
    pub fn attempts(&self) -> &AttemptCounter {
        &self.attempts
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Route to `target` when `success` holds, resetting the attempt count.
    pub fn set_ok_transition<C>(
        &self,
        machine: &mut Machine<C>,
        success: impl Condition<C> + 'static,
        target: StateId,
    ) -> Result<TransitionId, AssemblyError> {
        let transition = Transition::new("OK")
            .when(success)
            .when(ResetAttempts::new(self.attempts.clone()));
        machine.connect(self.state, target, transition)
    }

    /// Route to `retry_target` when `failure` holds and attempts remain,
    /// otherwise to `error_target`, resetting the attempt count.
    ///
    /// Both edges own a copy of `failure`; clones of a [`Predicate`]
    /// share one function.
    ///
    /// [`Predicate`]: crate::core::Predicate
    pub fn set_retry_error_transition<C, F>(
        &self,
        machine: &mut Machine<C>,
        failure: F,
        retry_target: StateId,
        error_target: StateId,
    ) -> Result<(TransitionId, TransitionId), AssemblyError>
    where
        F: Condition<C> + Clone + 'static,
    {
        let retry = Transition::new("RETRY")
            .reentering()
            .when(failure.clone())
            .when(AttemptsRemaining::new(self.attempts.clone(), self.retries));
        let retry = machine.connect(self.state, retry_target, retry)?;

        let error = Transition::new("ERROR")
            .when(failure)
            .when(AttemptsExhausted::new(self.attempts.clone(), self.retries));
        let error = machine.connect(self.state, error_target, error)?;

        Ok((retry, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Always, Predicate, Tick};

    struct Link {
        acked: bool,
    }

    struct Wiring {
        machine: Machine<Link>,
        retry: Retry,
        send: StateId,
        ok: StateId,
        error: StateId,
    }

    fn wire(retries: u32, acked: bool) -> Wiring {
        let mut machine = Machine::new("link", Link { acked });
        let ok = machine.add_state("ok").unwrap();
        let error = machine.add_state("error").unwrap();
        for parked in [ok, error] {
            machine
                .stay(parked, Transition::new("parked").when(Always::new()))
                .unwrap();
        }
        let send = machine.add_state("send").unwrap();
        let retry = Retry::create(&mut machine, "await-ack", 1, retries).unwrap();
        machine
            .connect(send, retry.state(), Transition::new("sent").when(Always::new()))
            .unwrap();
        retry
            .set_ok_transition(
                &mut machine,
                Predicate::new("acked", |t: &Tick<Link>| t.context().acked),
                ok,
            )
            .unwrap();
        retry
            .set_retry_error_transition(
                &mut machine,
                Predicate::new("no ack", |t: &Tick<Link>| !t.context().acked),
                send,
                error,
            )
            .unwrap();
        machine.set_initial_state(send).unwrap();
        Wiring {
            machine,
            retry,
            send,
            ok,
            error,
        }
    }

    fn run_until_parked(wiring: &mut Wiring) -> StateId {
        for _ in 0..64 {
            wiring.machine.step();
            let current = wiring.machine.current().unwrap();
            if current == wiring.ok || current == wiring.error {
                return current;
            }
        }
        panic!("machine never parked");
    }

    #[test]
    fn success_routes_to_ok_and_resets_attempts() {
        let mut wiring = wire(2, true);

        let parked = run_until_parked(&mut wiring);

        assert_eq!(parked, wiring.ok);
        assert_eq!(wiring.retry.attempts().get(), AttemptCounter::INITIAL);
    }

    #[test]
    fn failures_retry_then_give_up() {
        let mut wiring = wire(2, false);

        let parked = run_until_parked(&mut wiring);

        assert_eq!(parked, wiring.error);
        assert_eq!(wiring.retry.attempts().get(), AttemptCounter::INITIAL);
        let sends = wiring
            .machine
            .history()
            .records()
            .filter(|r| r.to.as_str() == "send")
            .count();
        assert_eq!(sends, 2);
    }

    #[test]
    fn delay_holds_before_routing() {
        let mut wiring = wire(2, true);

        wiring.machine.step();
        wiring.machine.step();
        assert_eq!(wiring.machine.current(), Some(wiring.retry.state()));

        wiring.machine.step();
        assert_eq!(wiring.machine.current(), Some(wiring.ok));
        assert_ne!(wiring.machine.current(), Some(wiring.send));
    }

    #[test]
    fn edges_are_ordered_hold_ok_retry_error() {
        let wiring = wire(1, false);
        let state = wiring.machine.state(wiring.retry.state()).unwrap();

        let names: Vec<&str> = state
            .edges()
            .iter()
            .map(|e| wiring.machine.transition(e.transition).unwrap().id().as_str())
            .collect();

        assert_eq!(names, vec!["Waiting", "OK", "RETRY", "ERROR"]);
        assert!(state.attempts().is_some());
    }

    #[test]
    fn retrying_into_itself_begins_new_attempts() {
        let mut machine = Machine::new("self-retry", Link { acked: false });
        let error = machine.add_state("error").unwrap();
        machine
            .stay(error, Transition::new("parked").when(Always::new()))
            .unwrap();
        let retry = Retry::create(&mut machine, "retry", 1, 2).unwrap();
        retry
            .set_retry_error_transition(
                &mut machine,
                Predicate::new("no ack", |t: &Tick<Link>| !t.context().acked),
                retry.state(),
                error,
            )
            .unwrap();
        machine.set_initial_state(retry.state()).unwrap();

        for _ in 0..5 {
            machine.step();
            assert_eq!(machine.current(), Some(retry.state()));
        }
        machine.step();

        assert_eq!(machine.current(), Some(error));
        assert_eq!(retry.attempts().get(), AttemptCounter::INITIAL);
        let loops = machine
            .history()
            .records()
            .filter(|r| r.from == r.to)
            .count();
        assert_eq!(loops, 2);
    }

    #[test]
    fn retry_edge_reenters_but_hold_edge_does_not() {
        let wiring = wire(1, false);
        let state = wiring.machine.state(wiring.retry.state()).unwrap();

        let reentering: Vec<bool> = state
            .edges()
            .iter()
            .map(|e| wiring.machine.transition(e.transition).unwrap().reenters())
            .collect();

        assert_eq!(reentering, vec![false, false, true, false]);
    }
}
