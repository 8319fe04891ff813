use crate::Utils::plots::PlotError;
use crate::symbolic::errors::{LinearSolveError, SymbolicError};
use crate::symbolic::symbolic_engine::Equation;
use itertools::Itertools;
use thiserror::Error;

/// Failure kinds of the Build → Solve → Fit → Assemble pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OdeError {
    #[error("invalid shape: expected {expected}, got {found}")]
    InvalidShape { expected: String, found: String },
    #[error("no closed-form solution for {equation}: {reason}")]
    Unsolvable { equation: String, reason: String },
    #[error("{conditions} condition(s) for {constants} free constant(s): under-determined")]
    UnderDetermined { constants: usize, conditions: usize },
    #[error("{conditions} condition(s) for {constants} free constant(s): over-determined")]
    OverDetermined { constants: usize, conditions: usize },
    #[error("the conditions are inconsistent: {equations}")]
    NoSolution { equations: String },
    #[error("the conditions do not fix the constants uniquely: {equations}")]
    MultipleSolutions { equations: String },
    #[error("the condition {equation} falls on a singular point of the solution")]
    SingularCondition { equation: String },
    #[error("the constants appear non-linearly in {equation}")]
    NonlinearConstants { equation: String },
    #[error(transparent)]
    Symbolic(#[from] SymbolicError),
    #[error(transparent)]
    Plot(#[from] PlotError),
}

impl OdeError {
    /// Maps a failure of the constant solve onto the fitter's error kinds.
    pub fn from_fit(err: LinearSolveError, equations: &[Equation]) -> Self {
        let listing = || equations.iter().map(|eq| eq.to_string()).join("; ");
        match err {
            LinearSolveError::NonFinite { row, equation } => OdeError::SingularCondition {
                equation: equations.get(row).map_or(equation, |eq| eq.to_string()),
            },
            LinearSolveError::Nonlinear { equation } => OdeError::NonlinearConstants { equation },
            LinearSolveError::Inconsistent { .. } => OdeError::NoSolution { equations: listing() },
            LinearSolveError::Underdetermined { .. } => OdeError::MultipleSolutions { equations: listing() },
        }
    }
}
