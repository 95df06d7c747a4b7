//! Guard conditions for transitions.
//!
//! A condition is a boolean guard evaluated against a [`Tick`]. Most
//! conditions are pure functions of the view they receive. The exceptions
//! are documented on the type: [`Countdown`] and the attempt gates in
//! [`attempts`](super::attempts) mutate themselves (or a shared counter)
//! every time they are evaluated, and composite states rely on that.

use super::identifier::Identifier;
use super::tick::Tick;
use std::fmt;
use std::sync::Arc;

/// A guard consulted by a transition.
///
/// Implementations must not panic during evaluation; a guard that cannot
/// decide should answer `false`.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Condition, Identifier, Predicate, Tick};
///
/// struct Plant {
///     pressure: u32,
/// }
///
/// let mut high = Predicate::new("pressure > 10", |t: &Tick<Plant>| t.context().pressure > 10);
///
/// let machine = Identifier::new("boiler");
/// let state = Identifier::new("heating");
/// let plant = Plant { pressure: 12 };
///
/// assert!(high.evaluate(&Tick::new(&machine, &state, &plant)));
/// ```
pub trait Condition<C>: Send {
    fn id(&self) -> &Identifier;

    fn evaluate(&mut self, tick: &Tick<'_, C>) -> bool;

    /// Re-arm any internal state. No-op for stateless guards.
    fn reset(&mut self) {}
}

impl<C> Condition<C> for Box<dyn Condition<C>> {
    fn id(&self) -> &Identifier {
        (**self).id()
    }

    fn evaluate(&mut self, tick: &Tick<'_, C>) -> bool {
        (**self).evaluate(tick)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Constant-true guard.
#[derive(Clone, Debug)]
pub struct Always {
    id: Identifier,
}

impl Always {
    /// A constant-true guard named `True`.
    pub fn new() -> Self {
        Self::named("True")
    }

    /// A constant-true guard with a descriptive name for the logs.
    pub fn named(id: impl Into<Identifier>) -> Self {
        Always { id: id.into() }
    }
}

impl Default for Always {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Condition<C> for Always {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, _tick: &Tick<'_, C>) -> bool {
        true
    }
}

/// Constant-false guard.
#[derive(Clone, Debug)]
pub struct Never {
    id: Identifier,
}

impl Never {
    /// A constant-false guard named `False`.
    pub fn new() -> Self {
        Self::named("False")
    }

    pub fn named(id: impl Into<Identifier>) -> Self {
        Never { id: id.into() }
    }
}

impl Default for Never {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Condition<C> for Never {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, _tick: &Tick<'_, C>) -> bool {
        false
    }
}

type PredicateFn<C> = Arc<dyn Fn(&Tick<'_, C>) -> bool + Send + Sync>;

/// Guard backed by an application-supplied function of the machine.
///
/// Clones share the same function, which is what lets one predicate guard
/// several transitions.
pub struct Predicate<C> {
    id: Identifier,
    predicate: PredicateFn<C>,
}

impl<C> Predicate<C> {
    /// Wrap `predicate` under the name `id`.
    pub fn new<F>(id: impl Into<Identifier>, predicate: F) -> Self
    where
        F: Fn(&Tick<'_, C>) -> bool + Send + Sync + 'static,
    {
        Predicate {
            id: id.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl<C> Clone for Predicate<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Predicate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("id", &self.id).finish()
    }
}

impl<C> Condition<C> for Predicate<C> {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, tick: &Tick<'_, C>) -> bool {
        let result = (self.predicate)(tick);
        if tick.is_verbose() {
            tracing::debug!(condition = %self.id, result, "evaluating predicate");
        }
        result
    }
}

/// Inverts another guard.
///
/// Holds no state of its own; `reset` is forwarded to the wrapped guard.
pub struct Not<C> {
    id: Identifier,
    inner: Box<dyn Condition<C>>,
}

impl<C> Not<C> {
    /// Invert `inner`; the result is named `!` followed by its name.
    pub fn new(inner: impl Condition<C> + 'static) -> Self {
        let id = Identifier::new(format!("!{}", inner.id()));
        Not {
            id,
            inner: Box::new(inner),
        }
    }
}

impl<C> Condition<C> for Not<C> {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, tick: &Tick<'_, C>) -> bool {
        !self.inner.evaluate(tick)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Tick-counted timeout.
///
/// After a reset, the first `ticks` evaluations return `false`; every
/// evaluation after that returns `true` until the next reset. Each
/// evaluation consumes one tick of the budget, so a countdown must be
/// evaluated exactly once per machine step to measure ticks.
#[derive(Clone, Debug)]
pub struct Countdown {
    id: Identifier,
    ticks: u32,
    remaining: u32,
}

impl Countdown {
    /// A countdown of `ticks` evaluations named `OneShotWait`.
    pub fn new(ticks: u32) -> Self {
        Self::named("OneShotWait", ticks)
    }

    pub fn named(id: impl Into<Identifier>, ticks: u32) -> Self {
        Countdown {
            id: id.into(),
            ticks,
            remaining: ticks,
        }
    }

    /// Budget restored by every reset.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Evaluations left before the countdown expires.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

impl<C> Condition<C> for Countdown {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, _tick: &Tick<'_, C>) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }

    fn reset(&mut self) {
        self.remaining = self.ticks;
    }
}
