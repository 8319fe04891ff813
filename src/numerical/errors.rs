use crate::Utils::plots::PlotError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0} does not fit into u64")]
    Overflow(String),
    #[error(transparent)]
    Plot(#[from] PlotError),
}
