//! Build errors for the machine builder.

use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Machine identifier not specified. Call .id(name) before .build()")]
    MissingIdentifier,

    #[error("Machine identifier must not be empty")]
    EmptyIdentifier,
}
