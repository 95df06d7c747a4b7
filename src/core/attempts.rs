//! Attempt counting for retrying states.
//!
//! A retrying state and the gates on its outgoing transitions share one
//! [`AttemptCounter`]. The state begins an attempt every time it is entered;
//! the gates decide whether attempts remain and reset the counter when a
//! path ends the retry cycle.

use super::condition::Condition;
use super::identifier::Identifier;
use super::tick::Tick;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Shared handle to the number of the next attempt.
///
/// The counter starts at [`AttemptCounter::INITIAL`]; clones observe and
/// mutate the same value.
#[derive(Clone, Debug)]
pub struct AttemptCounter {
    next: Arc<AtomicU32>,
}

impl AttemptCounter {
    pub const INITIAL: u32 = 1;

    pub fn new() -> Self {
        AttemptCounter {
            next: Arc::new(AtomicU32::new(Self::INITIAL)),
        }
    }

    /// Number the next attempt will carry.
    pub fn get(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }

    /// Attempts begun since the last reset.
    pub fn attempts_made(&self) -> u32 {
        self.get().saturating_sub(Self::INITIAL)
    }

    /// Start an attempt, returning its number.
    pub fn begin_attempt(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.next.store(Self::INITIAL, Ordering::Relaxed);
    }
}

impl Default for AttemptCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Success gate: always true, and resets the counter as a side effect.
///
/// Placed after the success guard of a transition so the reset only happens
/// when that guard held.
#[derive(Clone, Debug)]
pub struct ResetAttempts {
    id: Identifier,
    counter: AttemptCounter,
}

impl ResetAttempts {
    pub fn new(counter: AttemptCounter) -> Self {
        ResetAttempts {
            id: Identifier::new("ok & reset"),
            counter,
        }
    }
}

impl<C> Condition<C> for ResetAttempts {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, _tick: &Tick<'_, C>) -> bool {
        self.counter.reset();
        true
    }
}

/// True while the attempts made have not exceeded `retries`. Never mutates.
#[derive(Clone, Debug)]
pub struct AttemptsRemaining {
    id: Identifier,
    counter: AttemptCounter,
    retries: u32,
}

impl AttemptsRemaining {
    pub fn new(counter: AttemptCounter, retries: u32) -> Self {
        AttemptsRemaining {
            id: Identifier::new(format!("retries <= {}", retries)),
            counter,
            retries,
        }
    }
}

impl<C> Condition<C> for AttemptsRemaining {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, _tick: &Tick<'_, C>) -> bool {
        self.counter.attempts_made() <= self.retries
    }
}

/// Exhaustion gate: true once the attempts made exceed `retries`, in which
/// case the counter is reset. Leaves the counter alone otherwise.
#[derive(Clone, Debug)]
pub struct AttemptsExhausted {
    id: Identifier,
    counter: AttemptCounter,
    retries: u32,
}

impl AttemptsExhausted {
    pub fn new(counter: AttemptCounter, retries: u32) -> Self {
        AttemptsExhausted {
            id: Identifier::new(format!("retries > {}", retries)),
            counter,
            retries,
        }
    }
}

impl<C> Condition<C> for AttemptsExhausted {
    fn id(&self) -> &Identifier {
        &self.id
    }

    fn evaluate(&mut self, _tick: &Tick<'_, C>) -> bool {
        if self.counter.attempts_made() > self.retries {
            self.counter.reset();
            return true;
        }
        false
    }
}
