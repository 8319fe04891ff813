use crate::Utils::plots::PlotError;
use crate::symbolic::errors::SymbolicError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculusError {
    #[error("the quotient limit for this test does not converge: {0}")]
    TestLimitDiverges(String),
    #[error("the ratio test needs a sequence of positive terms, got the ratio limit {ratio} for {expr}")]
    NotPositive { expr: String, ratio: f64 },
    #[error("quadrature failed: {0}")]
    Quadrature(String),
    #[error(transparent)]
    Symbolic(#[from] SymbolicError),
    #[error(transparent)]
    Plot(#[from] PlotError),
}
