use hexbin::{HexCell, HexGrid};
use hexknn_helpers::{Float, L2Dist, PointSet, Tally};
use k_nn::{KnnClassifier, KnnError};
use std::fmt::Debug;

/// The predicted class of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionCell<L, F> {
    pub cell: HexCell<F>,
    pub label: L,
}

/// KNN predictions for every cell of a grid, in grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionField<L, F> {
    k: usize,
    cells: Vec<DecisionCell<L, F>>,
}

impl<L, F> DecisionField<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    /// A field without cells, used before anything has been computed.
    pub fn empty() -> Self {
        Self {
            k: 0,
            cells: Vec::new(),
        }
    }

    /// The k the field was built with (0 for an empty field).
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Predicted label of the cell at `index`.
    pub fn get(&self, index: usize) -> Option<&L> {
        self.cells.get(index).map(|c| &c.label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecisionCell<L, F>> {
        self.cells.iter()
    }

    /// Number of cells per predicted label, labels in order of first appearance.
    pub fn label_counts(&self) -> Vec<(L, usize)> {
        let tally: Tally<'_, L> = self.cells.iter().map(|c| &c.label).collect();
        tally
            .counts()
            .iter()
            .map(|&(label, count)| (label.clone(), count))
            .collect()
    }
}

/// Builds the decision field: a global KNN vote at every cell center.
///
/// Each center is classified against the whole point set, independent of
/// which points happen to fall inside the cell.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryFieldBuilder<'a, F: Float> {
    grid: &'a HexGrid<F>,
}

impl<'a, F: Float> BoundaryFieldBuilder<'a, F> {
    pub fn new(grid: &'a HexGrid<F>) -> Self {
        Self { grid }
    }

    /// # Errors
    ///
    /// Returns `KnnError::InvalidK` if `k` is 0 and `KnnError::InsufficientData`
    /// if `points` is empty.
    pub fn build<L>(
        &self,
        points: &PointSet<L, F>,
        k: usize,
    ) -> Result<DecisionField<L, F>, KnnError>
    where
        L: Clone + Eq + Debug,
    {
        let classifier = KnnClassifier::new(k, points, L2Dist)?;
        if points.is_empty() {
            return Err(KnnError::InsufficientData);
        }

        let mut cells = Vec::with_capacity(self.grid.len());
        for (cell, center) in self.grid.cells().iter().zip(self.grid.centers().rows()) {
            let label = classifier.predict(center)?;
            cells.push(DecisionCell { cell: *cell, label });
        }

        log::trace!(
            "decision field: {} cells, k={} (effective {})",
            cells.len(),
            k,
            classifier.effective_k()
        );
        Ok(DecisionField { k, cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbin::Extent;
    use hexknn_helpers::LabeledPoint;

    fn two_clusters() -> Vec<LabeledPoint<&'static str, f64>> {
        vec![
            LabeledPoint::new(1.0, 1.0, "A"),
            LabeledPoint::new(2.0, 1.5, "A"),
            LabeledPoint::new(8.0, 8.0, "B"),
            LabeledPoint::new(9.0, 8.5, "B"),
        ]
    }

    #[test]
    fn test_every_cell_gets_a_label() {
        let raw = two_clusters();
        let points = PointSet::new(&raw);
        let grid = HexGrid::new(Extent::from_points(&raw, 1.0).unwrap(), 1.0).unwrap();

        let field = BoundaryFieldBuilder::new(&grid).build(&points, 1).unwrap();
        assert_eq!(field.len(), grid.len());
        assert_eq!(field.k(), 1);
        for (entry, cell) in field.iter().zip(grid.cells()) {
            assert_eq!(entry.cell, *cell);
        }

        // The corners of the extent sit next to one cluster each.
        let near_a = grid.locate(0.0, 0.0).unwrap();
        let near_b = grid.locate(10.0, 9.5).unwrap();
        assert_eq!(field.get(near_a), Some(&"A"));
        assert_eq!(field.get(near_b), Some(&"B"));
    }

    #[test]
    fn test_empty_cells_still_classified_globally() {
        let raw = two_clusters();
        let points = PointSet::new(&raw);
        let grid = HexGrid::new(Extent::from_points(&raw, 1.0).unwrap(), 0.5).unwrap();
        let bins = grid.assign_bins(&points);

        let field = BoundaryFieldBuilder::new(&grid).build(&points, 3).unwrap();
        let empty_cells = (0..grid.len()).filter(|&i| bins.members(i).is_empty()).count();
        assert!(empty_cells > 0);
        assert!((0..grid.len()).all(|i| field.get(i).is_some()));
    }

    #[test]
    fn test_label_counts_cover_all_cells() {
        let raw = two_clusters();
        let points = PointSet::new(&raw);
        let grid = HexGrid::new(Extent::from_points(&raw, 1.0).unwrap(), 1.0).unwrap();
        let field = BoundaryFieldBuilder::new(&grid).build(&points, 1).unwrap();

        let counts = field.label_counts();
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), grid.len());
        assert!(counts.iter().all(|(l, _)| *l == "A" || *l == "B"));
    }

    #[test]
    fn test_empty_point_set_is_insufficient() {
        let points: PointSet<&str, f64> = PointSet::new(&[]);
        let grid = HexGrid::new(Extent::new(0.0, 0.0, 1.0, 1.0).unwrap(), 0.5).unwrap();
        let result = BoundaryFieldBuilder::new(&grid).build(&points, 3);
        assert_eq!(result, Err(KnnError::InsufficientData));
    }

    #[test]
    fn test_k_zero_is_rejected() {
        let raw = two_clusters();
        let points = PointSet::new(&raw);
        let grid = HexGrid::new(Extent::from_points(&raw, 1.0).unwrap(), 1.0).unwrap();
        let result = BoundaryFieldBuilder::new(&grid).build(&points, 0);
        assert_eq!(result, Err(KnnError::InvalidK));
    }
}
