use thiserror::Error;

/// Failures of the symbolic layer: parsing, evaluation, integration, inversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    #[error("cannot parse expression '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("no value supplied for variable '{0}'")]
    UnknownVariable(String),
    #[error("no closed form found for the integral of {expr} with respect to {var}")]
    NoClosedForm { expr: String, var: String },
    #[error("cannot solve {expr} = y for {var}")]
    NotInvertible { expr: String, var: String },
    #[error(transparent)]
    Linear(#[from] LinearSolveError),
}

/// Failures of the symbolic linear-system solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinearSolveError {
    #[error("equation {equation} is not linear in the unknowns")]
    Nonlinear { equation: String },
    #[error("the system is inconsistent (rank {rank} < augmented rank {augmented_rank})")]
    Inconsistent { rank: usize, augmented_rank: usize },
    #[error("the system has infinitely many solutions (rank {rank} < {unknowns} unknowns)")]
    Underdetermined { rank: usize, unknowns: usize },
    #[error("equation {row} ({equation}) has a non-finite coefficient")]
    NonFinite { row: usize, equation: String },
}
