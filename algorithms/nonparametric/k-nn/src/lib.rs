use std::cmp::Ordering;
use std::fmt::Debug;
use thiserror::Error;
// These are the core components from our shared library.
use hexknn_helpers::{Distance, L2Dist, PointSet, Tally};

// ndarray and hexknn_helpers are used in the public function signatures.
use hexknn_helpers::Float;
use ndarray::{ArrayView1, array};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Errors that can occur when using the k-NN classifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnnError {
    /// k cannot be zero for a k-NN classifier
    #[error("k cannot be zero for a k-NN classifier")]
    InvalidK,
    /// Cannot classify against an empty point set
    #[error("cannot classify with an empty point set")]
    InsufficientData,
    /// The query produced a non-comparable distance (NaN or infinite coordinates)
    #[error("invalid distance comparison (non-finite query coordinates)")]
    InvalidDistance,
}

/// One of the nearest points to a query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Neighbor<L, F> {
    /// Position of the point in its `PointSet`.
    pub index: usize,
    /// True (not relative) distance to the query.
    pub distance: F,
    pub label: L,
}

/// A k-Nearest Neighbors (k-NN) classifier over a borrowed [`PointSet`].
///
/// The classifier predicts the label of a query location by finding the `k`
/// closest points of the set and taking a majority vote among their labels.
///
/// # Type Parameters
///
/// * `L`: The type of the label (e.g., `String`, `&str`, or a custom `enum`).
/// * `F`: The float type for the coordinates (e.g., `f32`, `f64`).
/// * `D`: The distance metric, which must implement the `hexknn_helpers::Distance` trait.
#[derive(Debug, Clone)]
pub struct KnnClassifier<'a, L, F, D>
where
    L: Clone + Eq + Debug,
    F: Float,
    D: Distance<F>,
{
    k: usize,
    points: &'a PointSet<L, F>,
    distance: D,
}

impl<'a, L, F, D> KnnClassifier<'a, L, F, D>
where
    L: Clone + Eq + Debug,
    F: Float,
    D: Distance<F>,
{
    /// Creates a new k-NN classifier.
    ///
    /// # Arguments
    ///
    /// * `k`: The number of neighbors to consider for classification. Must be greater than 0.
    /// * `points`: The labeled points that vote.
    /// * `distance`: An instance of a struct that implements the `Distance` trait (e.g., `L2Dist`).
    ///
    /// # Errors
    ///
    /// Returns `KnnError::InvalidK` if `k` is 0, as this is not a valid configuration.
    pub fn new(k: usize, points: &'a PointSet<L, F>, distance: D) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK);
        }
        if k > points.len() {
            log::debug!("k={} exceeds {} points, voting with all of them", k, points.len());
        }
        Ok(Self {
            k,
            points,
            distance,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// The number of neighbors that actually vote: `k`, clamped to the size
    /// of the point set.
    pub fn effective_k(&self) -> usize {
        self.k.min(self.points.len())
    }

    /// Sorts every point by its distance to `features`, nearest first.
    ///
    /// Points at the same distance keep their `PointSet` order.
    fn ranked(&self, features: ArrayView1<F>) -> Result<Vec<(F, usize)>, KnnError> {
        if self.points.is_empty() {
            return Err(KnnError::InsufficientData);
        }

        // Relative distances (squared Euclidean for L2) order the same way as
        // true distances and skip the square root.
        let mut distances: Vec<(F, usize)> = self
            .points
            .coords()
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| (self.distance.rdistance(row, features), i))
            .collect();

        if distances.iter().any(|(d, _)| !d.is_finite()) {
            log::trace!("non-finite distance for query {:?}", features);
            return Err(KnnError::InvalidDistance);
        }

        // Stable sort: equal distances stay in insertion order.
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        distances.truncate(self.effective_k());
        Ok(distances)
    }

    /// Returns the `k` nearest points to `features`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns `KnnError::InsufficientData` if the point set is empty.
    /// Returns `KnnError::InvalidDistance` if the query has non-finite coordinates.
    pub fn neighbors(&self, features: ArrayView1<F>) -> Result<Vec<Neighbor<L, F>>, KnnError> {
        let labels = self.points.labels();
        Ok(self
            .ranked(features)?
            .into_iter()
            .map(|(rdist, index)| Neighbor {
                index,
                distance: self.distance.rdist_to_dist(rdist),
                label: labels[index].clone(),
            })
            .collect())
    }

    /// Predicts the label at the query location.
    ///
    /// # Arguments
    ///
    /// * `features`: An `ArrayView1` holding the `[x, y]` coordinates of the query.
    ///
    /// # Returns
    ///
    /// Returns the label with the most votes among the nearest neighbors.
    /// When several labels tie, the one whose first vote comes from the
    /// nearest neighbor wins.
    ///
    /// # Errors
    ///
    /// Returns `KnnError::InsufficientData` if the point set is empty.
    /// Returns `KnnError::InvalidDistance` if the query has non-finite coordinates.
    pub fn predict(&self, features: ArrayView1<F>) -> Result<L, KnnError> {
        let labels = self.points.labels();
        let neighbors = self.ranked(features)?;

        let tally: Tally<'_, L> = neighbors.iter().map(|&(_, i)| &labels[i]).collect();
        tally
            .winner()
            .map(|(label, _)| label.clone())
            .ok_or(KnnError::InsufficientData)
    }
}

/// Classifies the location `(x, y)` by Euclidean k-NN majority vote over `points`.
///
/// `k` larger than the point set is clamped to the point set size.
///
/// # Errors
///
/// Returns `KnnError::InvalidK` if `k` is 0 and `KnnError::InsufficientData`
/// if `points` is empty.
pub fn classify<L, F>(query: (F, F), points: &PointSet<L, F>, k: usize) -> Result<L, KnnError>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    let classifier = KnnClassifier::new(k, points, L2Dist)?;
    let features = array![query.0, query.1];
    classifier.predict(features.view())
}
