//! The machine: owns the graph and drives it one tick at a time.
//!
//! States and transitions live in arenas owned by the [`Machine`] and are
//! referred to by [`StateId`] and [`TransitionId`] handles. Topology is
//! assembled once, before the first tick; afterwards only guard internals,
//! log-once flags, the application context and the current/previous pair
//! change.
//!
//! # Example
//!
//! ```rust
//! use tickfsm::core::{Always, Transition};
//! use tickfsm::{Machine, Status};
//!
//! let mut machine = Machine::new("blinker", ());
//! let on = machine.add_state("on").unwrap();
//! let off = machine.add_state("off").unwrap();
//! machine.connect(on, off, Transition::new("toggle").when(Always::new())).unwrap();
//! machine.connect(off, on, Transition::new("toggle back").when(Always::new())).unwrap();
//! machine.set_initial_state(on).unwrap();
//!
//! assert_eq!(machine.step(), Status::Ok);
//! assert_eq!(machine.current(), Some(off));
//! assert_eq!(machine.previous(), Some(on));
//! ```

mod diagnostics;
mod error;
mod step;

pub use error::AssemblyError;

use crate::config::{DiagnosticsMode, MachineConfig, Verbosity};
use crate::core::{
    Binding, Edge, Identifier, NoHooks, State, StateHooks, StateId, StateKind, Status,
    Transition, TransitionId, TransitionLog, Work,
};
use std::collections::HashMap;
use std::fmt;

pub struct Machine<C> {
    id: Identifier,
    span: tracing::Span,
    states: Vec<State<C>>,
    index: HashMap<Identifier, StateId>,
    transitions: Vec<Transition<C>>,
    current: Option<StateId>,
    previous: Option<StateId>,
    recovery: Option<StateId>,
    status: Status,
    /// Set when the last tick chose a reentering self-transition.
    reentry: bool,
    tick: u64,
    verbosity: Verbosity,
    diagnostics: DiagnosticsMode,
    history: TransitionLog,
    context: C,
}

impl<C> Machine<C> {
    /// Create an empty machine with the default configuration.
    pub fn new(id: impl Into<Identifier>, context: C) -> Self {
        Self::with_config(id, MachineConfig::default(), context)
    }

    /// Create an empty machine whose verbosity, diagnostics mode and
    /// history capacity come from `config`.
    pub fn with_config(id: impl Into<Identifier>, config: MachineConfig, context: C) -> Self {
        let id = id.into();
        let span = tracing::info_span!("machine", id = %id);
        Machine {
            id,
            span,
            states: Vec::new(),
            index: HashMap::new(),
            transitions: Vec::new(),
            current: None,
            previous: None,
            recovery: None,
            status: Status::Ok,
            reentry: false,
            tick: 0,
            verbosity: config.verbosity,
            diagnostics: config.diagnostics,
            history: TransitionLog::with_capacity(config.history_capacity),
            context,
        }
    }

    /// Register a plain state without hooks.
    ///
    /// Fails with [`AssemblyError::DuplicateState`] when the identifier is
    /// taken.
    pub fn add_state(&mut self, id: impl Into<Identifier>) -> Result<StateId, AssemblyError> {
        self.add_state_of_kind(id.into(), StateKind::Plain, Box::new(NoHooks))
    }

    /// Register a plain state whose `hooks` run on entry, every tick and on
    /// exit.
    pub fn add_state_with_hooks(
        &mut self,
        id: impl Into<Identifier>,
        hooks: impl StateHooks<C> + 'static,
    ) -> Result<StateId, AssemblyError> {
        self.add_state_of_kind(id.into(), StateKind::Plain, Box::new(hooks))
    }

    /// Register a state whose only hook is a per-tick work function.
    pub fn add_state_with_work<F>(
        &mut self,
        id: impl Into<Identifier>,
        work: F,
    ) -> Result<StateId, AssemblyError>
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.add_state_of_kind(id.into(), StateKind::Plain, Box::new(Work(work)))
    }

    pub(crate) fn add_state_of_kind(
        &mut self,
        id: Identifier,
        kind: StateKind,
        hooks: Box<dyn StateHooks<C>>,
    ) -> Result<StateId, AssemblyError> {
        if self.index.contains_key(&id) {
            return Err(AssemblyError::DuplicateState(id));
        }
        let handle = StateId(self.states.len());
        if self.verbosity.allows(Verbosity::Debug) {
            tracing::debug!(machine = %self.id, state = %id, kind = kind.name(), "state registered");
        }
        self.index.insert(id.clone(), handle);
        self.states.push(State::new(id, kind, hooks));
        Ok(handle)
    }

    pub(crate) fn set_state_kind(
        &mut self,
        state: StateId,
        kind: StateKind,
    ) -> Result<(), AssemblyError> {
        self.state_mut(state)?.set_kind(kind);
        Ok(())
    }

    /// Register an unbound transition.
    pub fn add_transition(&mut self, transition: Transition<C>) -> TransitionId {
        let handle = TransitionId(self.transitions.len());
        self.transitions.push(transition);
        handle
    }

    /// Bind `transition` from `from` to `to` (or back to `from` when `to` is
    /// `None`) and append it to `from`'s edges.
    ///
    /// A transition can be bound once. A second attempt is logged, leaves
    /// the existing binding untouched and fails with
    /// [`AssemblyError::AlreadyBound`].
    pub fn add_state_transition(
        &mut self,
        from: StateId,
        transition: TransitionId,
        to: Option<StateId>,
    ) -> Result<(), AssemblyError> {
        let to = to.unwrap_or(from);
        self.bind(transition, from, to)?;
        self.state_mut(from)?.push_edge(Edge { transition, to });
        Ok(())
    }

    /// Make `transition` the stay transition of `state`. It is bound from the
    /// state to itself and armed so its first firing after each entry is
    /// logged once.
    pub fn set_stay_transition(
        &mut self,
        state: StateId,
        transition: TransitionId,
    ) -> Result<(), AssemblyError> {
        let owner = self.state(state).ok_or(AssemblyError::UnknownState(state.0))?;
        if owner.stay().is_some() {
            let id = owner.id().clone();
            tracing::error!(machine = %self.id, state = %id, "stay transition already set");
            return Err(AssemblyError::StayAlreadySet(id));
        }
        self.bind(transition, state, state)?;
        self.transitions[transition.0].arm();
        self.state_mut(state)?.set_stay(transition);
        Ok(())
    }

    /// Register `transition` and bind it as an edge from `from` to `to`.
    pub fn connect(
        &mut self,
        from: StateId,
        to: StateId,
        transition: Transition<C>,
    ) -> Result<TransitionId, AssemblyError> {
        let handle = self.add_transition(transition);
        self.add_state_transition(from, handle, Some(to))?;
        Ok(handle)
    }

    /// Register `transition` and make it the stay transition of `state`.
    pub fn stay(
        &mut self,
        state: StateId,
        transition: Transition<C>,
    ) -> Result<TransitionId, AssemblyError> {
        let handle = self.add_transition(transition);
        self.set_stay_transition(state, handle)?;
        Ok(handle)
    }

    fn bind(
        &mut self,
        transition: TransitionId,
        from: StateId,
        to: StateId,
    ) -> Result<(), AssemblyError> {
        let from_name = self.state_mut(from)?.id().clone();
        let to_name = self.state_mut(to)?.id().clone();
        let target = self
            .transitions
            .get_mut(transition.0)
            .ok_or(AssemblyError::UnknownTransition(transition.0))?;

        let binding = Binding {
            from,
            to,
            from_name,
            to_name,
        };
        if let Err(existing) = target.bind(binding) {
            let err = AssemblyError::AlreadyBound {
                transition: target.id().clone(),
                from: existing.from_name().clone(),
                to: existing.to_name().clone(),
            };
            tracing::error!(machine = %self.id, error = %err, "transition {} in use", target.id());
            return Err(err);
        }
        Ok(())
    }

    /// State the first tick enters.
    pub fn set_initial_state(&mut self, state: StateId) -> Result<(), AssemblyError> {
        self.state(state).ok_or(AssemblyError::UnknownState(state.0))?;
        self.current = Some(state);
        Ok(())
    }

    /// State adopted when a tick finds the machine without a current state.
    pub fn set_recovery_state(&mut self, state: StateId) -> Result<(), AssemblyError> {
        self.state(state).ok_or(AssemblyError::UnknownState(state.0))?;
        self.recovery = Some(state);
        Ok(())
    }

    /// Identifier of the machine.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// State the next tick will run, or `None` after a state found no
    /// satisfied transition.
    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    /// State the last tick ran.
    pub fn previous(&self) -> Option<StateId> {
        self.previous
    }

    /// The current state itself.
    pub fn current_state(&self) -> Option<&State<C>> {
        self.current.and_then(|id| self.state(id))
    }

    /// Configured recovery state.
    pub fn recovery(&self) -> Option<StateId> {
        self.recovery
    }

    /// Status left by the last fault, `Ok` if none since the last
    /// [`clear_status`](Self::clear_status).
    pub fn status(&self) -> Status {
        self.status
    }

    /// Reset the status to `Ok`.
    pub fn clear_status(&mut self) {
        self.status = Status::Ok;
    }

    /// Number of ticks stepped so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Change how much the machine logs from the next event on.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// What fault dumps do with the faulting state's transitions.
    pub fn diagnostics(&self) -> DiagnosticsMode {
        self.diagnostics
    }

    /// Most recent state changes, oldest first.
    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    /// Shared access to the application context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the application context between ticks.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Handle of the state registered under `id`.
    pub fn state_id(&self, id: &str) -> Option<StateId> {
        self.index.get(id).copied()
    }

    /// The state behind a handle, if it belongs to this machine.
    pub fn state(&self, id: StateId) -> Option<&State<C>> {
        self.states.get(id.0)
    }

    /// Look a state up by its identifier.
    pub fn get_state(&self, id: &str) -> Option<&State<C>> {
        self.state_id(id).and_then(|handle| self.state(handle))
    }

    /// All states in registration order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State<C>)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    /// The transition behind a handle, if it belongs to this machine.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition<C>> {
        self.transitions.get(id.0)
    }

    /// All transitions in registration order, bound or not.
    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition<C>)> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(i, t)| (TransitionId(i), t))
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State<C>, AssemblyError> {
        self.states.get_mut(id.0).ok_or(AssemblyError::UnknownState(id.0))
    }

    fn name_of(&self, id: StateId) -> &Identifier {
        self.states[id.0].id()
    }
}

impl<C> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .field("current", &self.current.map(|s| self.name_of(s)))
            .field("previous", &self.previous.map(|s| self.name_of(s)))
            .field("status", &self.status)
            .field("tick", &self.tick)
            .finish()
    }
}
