//! Machine configuration.
//!
//! A [`MachineConfig`] carries the knobs that do not belong to the state
//! graph itself. It deserializes from any serde format so hosts can keep it
//! next to the rest of their settings; missing fields take their defaults.

use serde::{Deserialize, Serialize};

/// How chatty the machine is about its own evaluation.
///
/// This is independent of the `tracing` subscriber's filter: it decides
/// which of the machine's events are emitted at all. Error events are
/// always emitted. A fault dump raises it to `Debug` for the duration of
/// the dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Faults and transition dumps only.
    Error,
    /// Adds state entries and exits, transition firings, attempts and waits.
    #[default]
    Info,
    /// Adds per-guard outcomes and predicate results.
    Debug,
}

impl Verbosity {
    /// Whether events of `level` are emitted at this verbosity.
    pub fn allows(self, level: Verbosity) -> bool {
        self >= level
    }
}

/// What a fault dump does with the faulting state's transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsMode {
    /// Report the outcomes cached by the last evaluation. No guard runs.
    #[default]
    Describe,
    /// Follow every transition again. Stateful guards (countdowns, attempt
    /// gates) mutate and log-once flags flip exactly as during a real step.
    Reevaluate,
}

/// Default number of state changes kept in a machine's history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub verbosity: Verbosity,
    pub diagnostics: DiagnosticsMode,
    /// Maximum number of history records; 0 disables history.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Info,
            diagnostics: DiagnosticsMode::Describe,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
