use thiserror::Error;

use crate::target::TargetId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TargetingError {
    #[error("Target not found: {0}")]
    TargetNotFound(TargetId),

    #[error("Target position unresolvable: {0}")]
    PositionUnresolvable(TargetId),

    #[error("Target registry is empty")]
    RegistryEmpty,

    #[error("Target computer is disabled")]
    ComputerDisabled,

    #[error("Non-finite distance to target: {0}")]
    NonFiniteDistance(TargetId),

    #[error("Invariant violation on {id}: {detail}")]
    InvariantViolation { id: TargetId, detail: String },
}

pub type Result<T> = std::result::Result<T, TargetingError>;
