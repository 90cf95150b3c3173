//! # hexknn
//!
//! Shows how a k-nearest-neighbors decision boundary moves as k changes,
//! over labeled 2D points (penguin bill length against bill depth).
//!
//! The plane is tiled with hexagons. Every cell gets two labels:
//!
//! - a **decision** label, the KNN vote at the cell center over all
//!   displayed points ([`BoundaryFieldBuilder`]);
//! - a **density** label, the majority of the points that fall inside the
//!   cell, present only for occupied cells ([`DensityFieldBuilder`]).
//!
//! Both are computed in data space. Drawing them is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use hexknn::{Extent, HexGrid, LabeledPoint, recompute};
//!
//! let points = vec![
//!     LabeledPoint::new(40.0, 18.0, "Adelie"),
//!     LabeledPoint::new(42.0, 17.0, "Adelie"),
//!     LabeledPoint::new(50.0, 15.0, "Gentoo"),
//! ];
//! let extent = Extent::from_points(&points, 1.0).unwrap();
//! let grid = HexGrid::new(extent, 1.0).unwrap();
//!
//! let fields = recompute(&grid, &points, points.len(), 3).unwrap();
//! assert_eq!(fields.decision.len(), grid.len());
//! assert_eq!(fields.density.total_points(), 3);
//! ```

mod boundary;
mod config;
mod density;
mod error;
mod session;

pub use boundary::{BoundaryFieldBuilder, DecisionCell, DecisionField};
pub use config::{MAX_PARAM, MIN_PARAM, VisualizerConfig};
pub use density::{DensityCell, DensityField, DensityFieldBuilder};
pub use error::VisualizerError;
pub use session::{AnimationTarget, PlayState, RebuildRequest, Session};

pub use hexbin::{Extent, HexBins, HexCell, HexGrid, HexbinError};
pub use hexknn_helpers::{
    Distance, Float, L2Dist, LabeledPoint, PointError, PointSet, RawRecord, load_points,
};
pub use k_nn::{KnnClassifier, KnnError, Neighbor, classify};

use std::fmt::Debug;

/// The two label fields produced by one rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPair<L, F> {
    /// Number of loaded points the rebuild was asked to use.
    pub display_count: usize,
    pub k: usize,
    pub decision: DecisionField<L, F>,
    pub density: DensityField<L, F>,
}

impl<L, F> FieldPair<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    /// No fields yet.
    pub fn empty() -> Self {
        Self {
            display_count: 0,
            k: 0,
            decision: DecisionField::empty(),
            density: DensityField::empty(),
        }
    }
}

/// Rebuilds both fields for the first `display_count` points and `k`.
///
/// Pure: the same grid, points and parameters always give the same fields.
///
/// # Errors
///
/// Returns `VisualizerError::Knn(KnnError::InsufficientData)` when the
/// displayed point set is empty and `KnnError::InvalidK` for `k == 0`.
pub fn recompute<L, F>(
    grid: &HexGrid<F>,
    points: &[LabeledPoint<L, F>],
    display_count: usize,
    k: usize,
) -> Result<FieldPair<L, F>, VisualizerError>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    let displayed = PointSet::truncated(points, display_count);
    let decision = BoundaryFieldBuilder::new(grid).build(&displayed, k)?;
    let bins = grid.assign_bins(&displayed);
    let density = DensityFieldBuilder::build(&bins);

    Ok(FieldPair {
        display_count,
        k,
        decision,
        density,
    })
}
