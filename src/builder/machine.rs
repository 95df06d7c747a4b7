//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::config::{DiagnosticsMode, MachineConfig, Verbosity};
use crate::core::Identifier;
use crate::machine::Machine;

/// Builder for machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::MachineBuilder;
/// use tickfsm::config::{DiagnosticsMode, Verbosity};
///
/// let machine = MachineBuilder::new()
///     .id("pump")
///     .verbosity(Verbosity::Debug)
///     .diagnostics(DiagnosticsMode::Describe)
///     .history_capacity(16)
///     .build(0u32)
///     .unwrap();
///
/// assert_eq!(machine.id().as_str(), "pump");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MachineBuilder {
    id: Option<Identifier>,
    config: MachineConfig,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine identifier (required).
    pub fn id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the whole configuration, e.g. one loaded from a file.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn diagnostics(mut self, mode: DiagnosticsMode) -> Self {
        self.config.diagnostics = mode;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Build an empty machine owning `context`.
    pub fn build<C>(self, context: C) -> Result<Machine<C>, BuildError> {
        let id = self.id.ok_or(BuildError::MissingIdentifier)?;
        if id.as_str().trim().is_empty() {
            return Err(BuildError::EmptyIdentifier);
        }
        Ok(Machine::with_config(id, self.config, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_required_fields() {
        let result = MachineBuilder::new().build(());

        assert!(matches!(result, Err(BuildError::MissingIdentifier)));
    }

    #[test]
    fn builder_rejects_blank_identifier() {
        let result = MachineBuilder::new().id("  ").build(());

        assert!(matches!(result, Err(BuildError::EmptyIdentifier)));
    }

    #[test]
    fn fluent_settings_reach_the_machine() {
        let machine = MachineBuilder::new()
            .id("valve")
            .verbosity(Verbosity::Error)
            .diagnostics(DiagnosticsMode::Reevaluate)
            .history_capacity(0)
            .build(())
            .unwrap();

        assert_eq!(machine.verbosity(), Verbosity::Error);
        assert_eq!(machine.diagnostics(), DiagnosticsMode::Reevaluate);
        assert_eq!(machine.history().capacity(), 0);
        assert!(machine.current().is_none());
    }

    #[test]
    fn config_replaces_defaults() {
        let config: MachineConfig =
            serde_json::from_str(r#"{"verbosity":"debug","history_capacity":5}"#).unwrap();

        let machine = MachineBuilder::new()
            .id("loaded")
            .config(config)
            .build(())
            .unwrap();

        assert_eq!(machine.verbosity(), Verbosity::Debug);
        assert_eq!(machine.history().capacity(), 5);
    }
}
