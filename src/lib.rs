//! tickfsm: a tick-driven, guarded-transition state machine engine
//!
//! tickfsm is meant to be embedded in control software. The host calls
//! [`Machine::step`] once per scheduler tick; the machine runs the current
//! state's work hook, then walks that state's transitions in declaration
//! order and moves to the destination of the first one whose guards all
//! hold. The core never sleeps, blocks or spawns: waiting is counted in
//! ticks.
//!
//! # Core Concepts
//!
//! - **Condition**: a guard evaluated against a read-only [`Tick`](core::Tick)
//!   view; some guards (countdowns, attempt gates) mutate on evaluation
//! - **Transition**: an edge guarded by a short-circuiting AND of
//!   conditions, with log-once suppression of repeated firing logs
//! - **State**: ordered edges, an optional stay transition, and hooks
//! - **Machine**: drives entry, work, selection and exit, and degrades to a
//!   recovery state instead of halting when it faults
//! - **Composite states**: pass-through, wait and retry, built from the
//!   primitives above
//!
//! # Example
//!
//! ```rust
//! use tickfsm::builder::{simple_transition, MachineBuilder};
//! use tickfsm::composite::wait;
//! use tickfsm::Status;
//!
//! let mut machine = MachineBuilder::new().id("door").build(()).unwrap();
//! let closed = machine.add_state("closed").unwrap();
//! machine.stay(closed, simple_transition("locked")).unwrap();
//! let open = wait(&mut machine, "open", 2, closed).unwrap();
//! machine.set_initial_state(open).unwrap();
//!
//! machine.step();
//! machine.step();
//! assert_eq!(machine.current(), Some(open));
//!
//! assert_eq!(machine.step(), Status::Ok);
//! assert_eq!(machine.current(), Some(closed));
//! ```

pub mod builder;
pub mod composite;
pub mod config;
pub mod core;
pub mod machine;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{Condition, Identifier, StateId, Status, Transition, TransitionId};
pub use machine::{AssemblyError, Machine};
