use super::hold_transition;
use crate::core::{Always, Identifier, NoHooks, StateId, StateKind, Transition};
use crate::machine::{AssemblyError, Machine};

/// Register a state that stays for `ticks` ticks after every entry and moves
/// on to `to` on the tick after that.
pub fn wait<C: 'static>(
    machine: &mut Machine<C>,
    id: impl Into<Identifier>,
    ticks: u32,
    to: StateId,
) -> Result<StateId, AssemblyError> {
    let state = machine.add_state_of_kind(id.into(), StateKind::Plain, Box::new(NoHooks))?;
    let hold = machine.connect(state, state, hold_transition("waiting", ticks))?;
    machine.connect(state, to, Transition::new("True").when(Always::new()))?;
    machine.set_state_kind(state, StateKind::Wait { hold, delay: ticks })?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogOnce;

    fn waiting_machine(ticks: u32) -> (Machine<()>, StateId, StateId) {
        let mut machine = Machine::new("waiter", ());
        let done = machine.add_state("done").unwrap();
        machine
            .stay(done, Transition::new("done").when(Always::new()))
            .unwrap();
        let pause = wait(&mut machine, "pause", ticks, done).unwrap();
        machine.set_initial_state(pause).unwrap();
        (machine, pause, done)
    }

    #[test]
    fn stays_for_exactly_the_configured_ticks() {
        let (mut machine, pause, done) = waiting_machine(3);

        for _ in 0..3 {
            machine.step();
            assert_eq!(machine.current(), Some(pause));
        }
        machine.step();

        assert_eq!(machine.current(), Some(done));
    }

    #[test]
    fn zero_tick_wait_leaves_on_first_step() {
        let (mut machine, _, done) = waiting_machine(0);

        machine.step();

        assert_eq!(machine.current(), Some(done));
    }

    #[test]
    fn hold_edge_is_declared_first_and_armed_on_entry() {
        let (mut machine, pause, _) = waiting_machine(2);

        let hold = match machine.state(pause).unwrap().kind() {
            StateKind::Wait { hold, .. } => *hold,
            other => panic!("unexpected kind {:?}", other),
        };
        assert_eq!(machine.state(pause).unwrap().edges()[0].transition, hold);

        machine.step();

        assert_eq!(machine.transition(hold).unwrap().log_state(), LogOnce::Fired);
    }

    #[test]
    fn reentry_restarts_the_full_wait() {
        let mut machine = Machine::new("looper", ());
        let bounce = machine.add_state("bounce").unwrap();
        let pause = wait(&mut machine, "pause", 2, bounce).unwrap();
        machine
            .connect(bounce, pause, Transition::new("back").when(Always::new()))
            .unwrap();
        machine.set_initial_state(pause).unwrap();

        let mut visited = Vec::new();
        for _ in 0..8 {
            machine.step();
            visited.push(machine.current().unwrap());
        }

        assert_eq!(
            visited,
            vec![pause, pause, bounce, pause, pause, pause, bounce, pause]
        );
    }
}
