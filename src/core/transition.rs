//! Guarded transitions between states.

use super::condition::Condition;
use super::identifier::Identifier;
use super::state::StateId;
use super::tick::Tick;
use std::fmt;

/// Handle to a transition registered with a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub(crate) usize);

impl TransitionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Suppression of repeated "transition fired" logs.
///
/// ```text
/// Untracked --(fire)--> Untracked   logs every firing
/// Armed     --(fire)--> Fired       logs once
/// Fired     --(fire)--> Fired       silent
/// any       --(arm)---> Armed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogOnce {
    #[default]
    Untracked,
    Armed,
    Fired,
}

impl LogOnce {
    pub fn arm(&mut self) {
        *self = LogOnce::Armed;
    }

    /// Record a firing and report whether it should be logged.
    fn fire(&mut self) -> bool {
        match self {
            LogOnce::Untracked => true,
            LogOnce::Armed => {
                *self = LogOnce::Fired;
                true
            }
            LogOnce::Fired => false,
        }
    }
}

/// The state pair a transition connects. Fixed once set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub from: StateId,
    pub to: StateId,
    pub(crate) from_name: Identifier,
    pub(crate) to_name: Identifier,
}

impl Binding {
    pub fn from_name(&self) -> &Identifier {
        &self.from_name
    }

    pub fn to_name(&self) -> &Identifier {
        &self.to_name
    }
}

/// Outcome of one guard during the most recent evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardOutcome {
    pub condition: Identifier,
    /// `None` when the guard was skipped because an earlier one failed, or
    /// when the transition has never been followed.
    pub outcome: Option<bool>,
}

struct Guard<C> {
    condition: Box<dyn Condition<C>>,
    last: Option<bool>,
}

/// A directed edge guarded by a conjunction of conditions.
///
/// Conditions are evaluated in insertion order and evaluation stops at the
/// first one that fails, so guards with side effects placed later in the
/// list only run when every earlier guard held.
pub struct Transition<C> {
    id: Identifier,
    guards: Vec<Guard<C>>,
    binding: Option<Binding>,
    log: LogOnce,
    last: Option<bool>,
    reenters: bool,
}

impl<C> Transition<C> {
    /// An unguarded, unbound transition that logs every firing.
    pub fn new(id: impl Into<Identifier>) -> Self {
        Transition {
            id: id.into(),
            guards: Vec::new(),
            binding: None,
            log: LogOnce::Untracked,
            last: None,
            reenters: false,
        }
    }

    /// Append a guard, builder style.
    pub fn when(mut self, condition: impl Condition<C> + 'static) -> Self {
        self.add_condition(condition);
        self
    }

    /// Append a guard after the existing ones.
    pub fn add_condition(&mut self, condition: impl Condition<C> + 'static) {
        self.guards.push(Guard {
            condition: Box::new(condition),
            last: None,
        });
    }

    /// Start in the armed state so the first firing is logged once.
    pub fn log_once(mut self) -> Self {
        self.log.arm();
        self
    }

    /// Treat a firing that leads back to the source state as leaving and
    /// re-entering it: exit handling runs, and entry handling runs on the
    /// next tick. Other self-targeting transitions keep the machine in the
    /// state without re-entry.
    pub fn reentering(mut self) -> Self {
        self.reenters = true;
        self
    }

    pub fn reenters(&self) -> bool {
        self.reenters
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The state pair this transition connects, once bound.
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Whether the transition has been attached to a state.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Current log-once flag.
    pub fn log_state(&self) -> LogOnce {
        self.log
    }

    /// Log the next firing once, then stay silent until re-armed.
    pub fn arm(&mut self) {
        self.log.arm();
    }

    /// Guard names in evaluation order.
    pub fn condition_ids(&self) -> impl Iterator<Item = &Identifier> {
        self.guards.iter().map(|g| g.condition.id())
    }

    /// Result of the last [`follow`](Self::follow), if any.
    pub fn last_result(&self) -> Option<bool> {
        self.last
    }

    /// Cached guard outcomes of the last evaluation. Evaluates nothing.
    pub fn describe(&self) -> Vec<GuardOutcome> {
        self.guards
            .iter()
            .map(|g| GuardOutcome {
                condition: g.condition.id().clone(),
                outcome: g.last,
            })
            .collect()
    }

    /// Bind to a state pair. An existing binding is never replaced; it is
    /// handed back as the error.
    pub(crate) fn bind(&mut self, binding: Binding) -> Result<(), Binding> {
        if let Some(existing) = &self.binding {
            return Err(existing.clone());
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub(crate) fn reset_conditions(&mut self) {
        for guard in &mut self.guards {
            guard.condition.reset();
        }
    }

    /// Evaluate the guard conjunction, logging the firing if the log-once
    /// flag allows it.
    pub fn follow(&mut self, tick: &Tick<'_, C>) -> bool {
        let mut result = true;
        let mut satisfied = Vec::with_capacity(self.guards.len());

        for guard in &mut self.guards {
            if !result {
                guard.last = None;
                continue;
            }
            let outcome = guard.condition.evaluate(tick);
            guard.last = Some(outcome);
            if tick.is_verbose() {
                tracing::debug!(
                    transition = %self.id,
                    condition = %guard.condition.id(),
                    outcome,
                    "guard evaluated"
                );
            }
            if outcome {
                satisfied.push(guard.condition.id().clone());
            }
            result = outcome;
        }
        self.last = Some(result);

        if result && self.log.fire() && tick.logs_firings() {
            let (from, to) = match &self.binding {
                Some(b) => (b.from_name.as_str(), b.to_name.as_str()),
                None => ("?", "?"),
            };
            tracing::info!(
                transition = %self.id,
                "from {} to {} due to {}",
                from,
                to,
                satisfied
                    .iter()
                    .map(Identifier::as_str)
                    .collect::<Vec<_>>()
                    .join(" && ")
            );
        }

        result
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("conditions", &self.condition_ids().collect::<Vec<_>>())
            .field("binding", &self.binding)
            .field("log", &self.log)
            .finish()
    }
}
