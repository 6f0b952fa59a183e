use thiserror::Error;

use crate::problem::ProblemState;
use twopt_data::DataError;
use twopt_solver::{SolveStatus, SolverError};

/// Errors surfaced by the optimizer core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A compound identifier does not contain the requested tag token
    /// (`bld`, `reg` or `prov`).
    #[error("entry tag {tag:?} not found in {name:?}")]
    EntryNotFound { name: String, tag: &'static str },

    #[error("{op} is not allowed in state {state:?}")]
    StateOutOfOrder {
        op: &'static str,
        state: ProblemState,
    },

    #[error("building {0:?} has no bound solver variable")]
    UnboundVariable(String),

    /// The backend finished without a usable solution.
    #[error("solver finished with status {status}")]
    SolverFailure { status: SolveStatus },

    #[error("faction {0:?} missing from the factions table")]
    UnknownFaction(String),

    #[error("province index {0} out of range")]
    UnknownProvince(usize),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Data(#[from] DataError),
}
