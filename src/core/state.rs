//! States: nodes of the machine graph.
//!
//! A state owns its outgoing edges (each a transition plus destination), an
//! optional stay transition, and hooks that run while the machine is in it.

use super::attempts::AttemptCounter;
use super::identifier::Identifier;
use super::transition::TransitionId;
use crate::config::Verbosity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a state registered with a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One outgoing edge: the transition and where it leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub transition: TransitionId,
    pub to: StateId,
}

/// Built-in behavior a state adds on entry.
#[derive(Clone, Debug)]
pub enum StateKind {
    Plain,
    PassThrough,
    /// Holds for `delay` ticks before advancing.
    Wait { hold: TransitionId, delay: u32 },
    /// Holds for `delay` ticks, then routes on the outcome of an attempt.
    Retry {
        hold: TransitionId,
        delay: u32,
        attempts: AttemptCounter,
        retries: u32,
    },
}

impl StateKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::PassThrough => "pass-through",
            Self::Wait { .. } => "wait",
            Self::Retry { .. } => "retry",
        }
    }

    /// The self-targeting edge a composite state declares first.
    pub fn hold(&self) -> Option<TransitionId> {
        match self {
            Self::Wait { hold, .. } | Self::Retry { hold, .. } => Some(*hold),
            Self::Plain | Self::PassThrough => None,
        }
    }
}

/// Application code run by a state.
///
/// `work` runs once per tick while the state is current, before any of its
/// transitions is evaluated. `on_enter` and `on_leave` run after the
/// machine's own entry and exit handling.
pub trait StateHooks<C>: Send {
    fn work(&mut self, context: &mut C) {
        let _ = context;
    }

    fn on_enter(&mut self, context: &mut C) {
        let _ = context;
    }

    fn on_leave(&mut self, context: &mut C) {
        let _ = context;
    }
}

/// Hooks that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl<C> StateHooks<C> for NoHooks {}

/// Adapts a closure into a work-only hook set.
pub struct Work<F>(pub F);

impl<C, F> StateHooks<C> for Work<F>
where
    F: FnMut(&mut C) + Send,
{
    fn work(&mut self, context: &mut C) {
        (self.0)(context)
    }
}

pub struct State<C> {
    id: Identifier,
    edges: Vec<Edge>,
    stay: Option<TransitionId>,
    kind: StateKind,
    pub(crate) hooks: Box<dyn StateHooks<C>>,
}

impl<C> State<C> {
    pub(crate) fn new(id: Identifier, kind: StateKind, hooks: Box<dyn StateHooks<C>>) -> Self {
        State {
            id,
            edges: Vec::new(),
            stay: None,
            kind,
            hooks,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Outgoing edges in evaluation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn stay(&self) -> Option<TransitionId> {
        self.stay
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// Attempt counter of a retrying state.
    pub fn attempts(&self) -> Option<&AttemptCounter> {
        match &self.kind {
            StateKind::Retry { attempts, .. } => Some(attempts),
            _ => None,
        }
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub(crate) fn set_stay(&mut self, transition: TransitionId) {
        self.stay = Some(transition);
    }

    pub(crate) fn set_kind(&mut self, kind: StateKind) {
        self.kind = kind;
    }
}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("kind", &self.kind.name())
            .field("edges", &self.edges)
            .field("stay", &self.stay)
            .finish()
    }
}

/// Entry and exit logs shared by every state kind.
pub(crate) fn log_enter(id: &Identifier, verbosity: Verbosity) {
    if verbosity.allows(Verbosity::Info) {
        tracing::info!(state = %id, "entering state: {}", id);
    }
}

pub(crate) fn log_leave(id: &Identifier, verbosity: Verbosity) {
    if verbosity.allows(Verbosity::Info) {
        tracing::info!(state = %id, "leaving state: {}", id);
    }
}
