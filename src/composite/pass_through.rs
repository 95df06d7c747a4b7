use crate::core::{Always, Identifier, NoHooks, StateId, StateKind, Transition};
use crate::machine::{AssemblyError, Machine};

/// Register a join node that moves on to `to` on the tick after entry.
pub fn pass_through<C>(
    machine: &mut Machine<C>,
    id: impl Into<Identifier>,
    to: StateId,
) -> Result<StateId, AssemblyError> {
    let state = machine.add_state_of_kind(id.into(), StateKind::PassThrough, Box::new(NoHooks))?;
    machine.connect(
        state,
        to,
        Transition::new("passing-through").when(Always::new()),
    )?;
    Ok(state)
}
