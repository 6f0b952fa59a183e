use thiserror::Error;

use crate::expr::VarId;

/// Errors from the model-building and solve layer.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("variable name {0:?} already exists in this model")]
    DuplicateVariable(String),

    #[error("constraint label {0:?} already exists in this model")]
    DuplicateConstraintName(String),

    /// A constraint or objective referenced a variable that was declared but
    /// never committed, or that belongs to a previous model generation.
    #[error("variable {0:?} is not bound in the current model")]
    UnboundVariable(String),

    #[error("unknown variable handle {0:?}")]
    UnknownVariable(VarId),

    #[error("the model has not been solved yet")]
    NotSolved,
}
