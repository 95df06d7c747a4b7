//! Whole-graph validation of a machine before it is ticked.
//!
//! The construction API rejects mistakes it can see locally (duplicate
//! identifiers, re-binding). Problems that only show once the graph is
//! complete are collected here, using Stillwater's `Validation` to report
//! ALL of them in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use tickfsm::Machine;
//! use tickfsm::validation::TopologyIssue;
//! use stillwater::validation::Validation;
//!
//! let mut machine = Machine::new("unfinished", ());
//! machine.add_state("orphan").unwrap();
//!
//! match machine.validate() {
//!     Validation::Failure(issues) => {
//!         assert!(issues.iter().any(|i| matches!(i, TopologyIssue::MissingInitialState)));
//!         assert!(issues.iter().any(|i| matches!(i, TopologyIssue::DeadEnd { .. })));
//!     }
//!     Validation::Success(_) => panic!("expected issues"),
//! }
//! ```

mod issues;

pub use issues::TopologyIssue;

use crate::core::StateKind;
use crate::machine::Machine;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TopologyIssue>>;

fn check(ok: bool, issue: impl FnOnce() -> TopologyIssue) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

impl<C> Machine<C> {
    /// Check the assembled graph, accumulating every issue found.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<TopologyIssue>> {
        let mut checks: Vec<Check> = Vec::new();

        checks.push(check(self.current().is_some() || self.tick() > 0, || {
            TopologyIssue::MissingInitialState
        }));

        for (_, state) in self.states() {
            checks.push(check(
                !state.edges().is_empty() || state.stay().is_some(),
                || TopologyIssue::DeadEnd {
                    state: state.id().clone(),
                },
            ));

            if let StateKind::Retry { hold, .. } = state.kind() {
                let outcomes = state
                    .edges()
                    .iter()
                    .filter(|e| e.transition != *hold)
                    .count();
                checks.push(check(outcomes > 0, || TopologyIssue::RetryNotWired {
                    state: state.id().clone(),
                }));
            }
        }

        for (_, transition) in self.transitions() {
            checks.push(check(transition.is_bound(), || {
                TopologyIssue::UnboundTransition {
                    transition: transition.id().clone(),
                }
            }));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Retry;
    use crate::core::{Always, Transition};

    fn issues(machine: &Machine<()>) -> Vec<TopologyIssue> {
        match machine.validate() {
            Validation::Failure(errors) => errors.iter().cloned().collect(),
            Validation::Success(_) => Vec::new(),
        }
    }

    #[test]
    fn complete_graph_passes() {
        let mut machine = Machine::new("ok", ());
        let a = machine.add_state("a").unwrap();
        let b = machine.add_state("b").unwrap();
        machine
            .connect(a, b, Transition::new("go").when(Always::new()))
            .unwrap();
        machine
            .stay(b, Transition::new("rest").when(Always::new()))
            .unwrap();
        machine.set_initial_state(a).unwrap();

        assert!(machine.validate().is_success());
    }

    #[test]
    fn validation_accumulates_all_issues() {
        let mut machine = Machine::new("broken", ());
        machine.add_state("island").unwrap();
        machine.add_transition(Transition::new("loose"));
        Retry::create(&mut machine, "retry", 1, 1).unwrap();

        let found = issues(&machine);

        assert!(found.contains(&TopologyIssue::MissingInitialState));
        assert!(found.contains(&TopologyIssue::DeadEnd {
            state: "island".into()
        }));
        assert!(found.contains(&TopologyIssue::UnboundTransition {
            transition: "loose".into()
        }));
        assert!(found.contains(&TopologyIssue::RetryNotWired {
            state: "retry".into()
        }));
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn issues_render_readably() {
        let issue = TopologyIssue::DeadEnd {
            state: "island".into(),
        };
        assert_eq!(
            issue.to_string(),
            "State 'island' has no transitions and no stay transition"
        );
    }
}
