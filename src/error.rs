use hexbin::HexbinError;
use k_nn::KnnError;
use thiserror::Error;

use crate::config::{MAX_PARAM, MIN_PARAM};

/// Errors surfaced by the visualization core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisualizerError {
    /// Classification failed (empty point set, k = 0, non-finite query)
    #[error(transparent)]
    Knn(#[from] KnnError),

    /// The grid could not be built
    #[error(transparent)]
    Hexbin(#[from] HexbinError),

    /// A driver parameter is outside the interactive range
    #[error("{name} must be within {}..={}, got {value}", MIN_PARAM, MAX_PARAM)]
    OutOfRange { name: &'static str, value: usize },

    /// A configuration value is not usable
    #[error("invalid configuration value for `{0}`")]
    InvalidConfig(&'static str),
}
