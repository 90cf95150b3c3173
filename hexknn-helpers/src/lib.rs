use ndarray::NdFloat;

use num_traits::{AsPrimitive, NumCast};

// Include submodules
mod common;
mod distance;
mod tally;

// Re-export types from submodules
pub use common::{load_points, LabeledPoint, PointError, PointSet, RawRecord};
pub use distance::{Distance, L2Dist};
pub use tally::Tally;

/// Floating point type for coordinates and distances.
///
/// `as_` truncates into grid indices; `cast` converts configuration values.
pub trait Float: NdFloat + AsPrimitive<usize> {
    fn cast<T: NumCast>(x: T) -> Option<Self> {
        NumCast::from(x)
    }
}

impl Float for f32 {}

impl Float for f64 {}
