//! Pre-wired states built only from conditions and transitions.
//!
//! - [`pass_through`]: unconditionally forwards to its destination
//! - [`wait`]: stays for a fixed number of ticks, then forwards
//! - [`Retry`]: waits between attempts and routes on their outcome, giving
//!   up after a bounded number of retries
//!
//! Wait and retry states declare a *hold* edge first: a self-targeting
//! transition guarded by `!Countdown`. While the countdown runs the hold
//! edge wins and the state stays; once it expires the edges declared after
//! it get their turn. Entering either state resets the countdown.

mod pass_through;
mod retry;
mod wait;

pub use pass_through::pass_through;
pub use retry::Retry;
pub use wait::wait;

use crate::core::{Countdown, Not, Transition};

/// The hold edge shared by wait and retry states.
fn hold_transition<C: 'static>(id: &str, ticks: u32) -> Transition<C> {
    Transition::new(id).when(Not::new(Countdown::new(ticks)))
}
