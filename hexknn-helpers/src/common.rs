use crate::Float;
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::fmt::Debug;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Errors raised while turning loaded records into labeled points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointError {
    /// A record is missing a required field, or a measurement is not a finite number.
    #[error("malformed point: missing or invalid `{0}`")]
    MalformedPoint(&'static str),
}

/// Represents a single labeled observation in the 2D plane.
///
/// L: The type of the label (e.g., String, &str, enum).
/// F: The float type for the coordinates (e.g., f32, f64).
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    pub x: F,
    pub y: F,
    pub label: L,
}

impl<L, F> LabeledPoint<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    pub fn new(x: F, y: F, label: L) -> Self {
        LabeledPoint { x, y, label }
    }

    /// Both coordinates are finite (not NaN, not infinite).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One row as handed over by the dataset loader.
///
/// Measurements are optional because the source CSV marks missing values
/// with `NA`; such rows never make it into a [`PointSet`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct RawRecord {
    pub species: Option<String>,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
}

impl TryFrom<RawRecord> for LabeledPoint<String, f64> {
    type Error = PointError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        let label = record
            .species
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(PointError::MalformedPoint("species"))?;
        let x = record
            .bill_length_mm
            .filter(|v| v.is_finite())
            .ok_or(PointError::MalformedPoint("bill_length_mm"))?;
        let y = record
            .bill_depth_mm
            .filter(|v| v.is_finite())
            .ok_or(PointError::MalformedPoint("bill_depth_mm"))?;
        Ok(LabeledPoint::new(x, y, label))
    }
}

/// Converts loader rows into labeled points, skipping malformed rows.
///
/// Returns the clean points in load order together with the number of
/// rows that were skipped.
pub fn load_points<I>(records: I) -> (Vec<LabeledPoint<String, f64>>, usize)
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut points = Vec::new();
    let mut skipped = 0;
    for (row, record) in records.into_iter().enumerate() {
        match LabeledPoint::<String, f64>::try_from(record) {
            Ok(point) => points.push(point),
            Err(e) => {
                log::warn!("skipping row {}: {}", row, e);
                skipped += 1;
            }
        }
    }
    log::debug!("loaded {} points ({} skipped)", points.len(), skipped);
    (points, skipped)
}

/// The read-only set of points the classifier votes with.
///
/// Coordinates are stored as an `n x 2` matrix (column 0 is `x`, column 1 is
/// `y`) with the labels alongside, in the same order as they were loaded.
/// A `PointSet` never contains non-finite coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    coords: Array2<F>,
    labels: Vec<L>,
}

impl<L, F> PointSet<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    /// Builds a point set from every finite point of `points`.
    pub fn new(points: &[LabeledPoint<L, F>]) -> Self {
        Self::truncated(points, points.len())
    }

    /// Builds a point set from the first `limit` finite entries of `points`.
    ///
    /// Entries with non-finite coordinates are skipped before counting, so
    /// the result holds `limit` points unless fewer finite ones exist.
    pub fn truncated(points: &[LabeledPoint<L, F>], limit: usize) -> Self {
        let mut skipped = 0;
        let kept: Vec<&LabeledPoint<L, F>> = points
            .iter()
            .filter(|p| {
                let finite = p.is_finite();
                skipped += usize::from(!finite);
                finite
            })
            .take(limit)
            .collect();
        if skipped > 0 {
            log::warn!("skipped {} points with non-finite coordinates", skipped);
        }

        let mut coords = Array2::zeros((kept.len(), 2));
        let mut labels = Vec::with_capacity(kept.len());
        for (i, p) in kept.into_iter().enumerate() {
            coords[[i, 0]] = p.x;
            coords[[i, 1]] = p.y;
            labels.push(p.label.clone());
        }
        Self { coords, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The `n x 2` coordinate matrix.
    pub fn coords(&self) -> ArrayView2<'_, F> {
        self.coords.view()
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Iterates over `(coordinates, label)` pairs in load order.
    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, F>, &L)> + '_ {
        self.coords.rows().into_iter().zip(self.labels.iter())
    }

    /// Returns an owned copy of the point at `index`.
    pub fn get(&self, index: usize) -> Option<LabeledPoint<L, F>> {
        let label = self.labels.get(index)?;
        Some(LabeledPoint::new(
            self.coords[[index, 0]],
            self.coords[[index, 1]],
            label.clone(),
        ))
    }

    /// Distinct labels in order of first appearance.
    pub fn classes(&self) -> Vec<L> {
        let mut classes: Vec<L> = Vec::new();
        for label in &self.labels {
            if !classes.contains(label) {
                classes.push(label.clone());
            }
        }
        classes
    }
}
