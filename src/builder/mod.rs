//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder for machines and shorthand
//! constructors for the most common transitions.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;

use crate::core::{Always, Identifier, Predicate, Tick, Transition};

/// Create an unconditional transition.
///
/// # Example
///
/// ```
/// use tickfsm::builder::simple_transition;
/// use tickfsm::Machine;
///
/// let mut machine = Machine::new("m", ());
/// let a = machine.add_state("a").unwrap();
/// let b = machine.add_state("b").unwrap();
/// machine.connect(a, b, simple_transition("a to b")).unwrap();
/// ```
pub fn simple_transition<C>(id: impl Into<Identifier>) -> Transition<C> {
    Transition::new(id).when(Always::new())
}

/// Create a transition guarded by a single predicate named `guard`.
///
/// # Example
///
/// ```
/// use tickfsm::builder::guarded_transition;
/// use tickfsm::core::Tick;
/// use tickfsm::Machine;
///
/// let mut machine = Machine::new("m", 0u32);
/// let low = machine.add_state("low").unwrap();
/// let high = machine.add_state("high").unwrap();
/// machine
///     .connect(
///         low,
///         high,
///         guarded_transition("rise", "level > 5", |t: &Tick<u32>| *t.context() > 5),
///     )
///     .unwrap();
/// ```
pub fn guarded_transition<C, F>(
    id: impl Into<Identifier>,
    guard: impl Into<Identifier>,
    predicate: F,
) -> Transition<C>
where
    C: 'static,
    F: Fn(&Tick<'_, C>) -> bool + Send + Sync + 'static,
{
    Transition::new(id).when(Predicate::new(guard, predicate))
}
