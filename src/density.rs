use hexbin::{HexBins, HexCell};
use hexknn_helpers::{Float, Tally};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// The observed majority of one occupied cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCell<L, F> {
    pub cell: HexCell<F>,
    /// Most frequent label among the cell's points.
    pub label: L,
    /// Number of points in the cell.
    pub count: usize,
    /// How many of those points carry `label`.
    pub votes: usize,
}

/// Majority labels of the occupied cells, keyed by cell index.
///
/// Cells without points have no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField<L, F> {
    cells: BTreeMap<usize, DensityCell<L, F>>,
}

impl<L, F> DensityField<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    pub fn empty() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DensityCell<L, F>> {
        self.cells.get(&index)
    }

    /// Occupied cells in grid order.
    pub fn iter(&self) -> impl Iterator<Item = &DensityCell<L, F>> {
        self.cells.values()
    }

    /// Total number of points over all cells.
    pub fn total_points(&self) -> usize {
        self.cells.values().map(|c| c.count).sum()
    }

    /// Point count of the fullest cell, 0 for an empty field.
    pub fn max_count(&self) -> usize {
        self.cells.values().map(|c| c.count).max().unwrap_or(0)
    }
}

/// Builds the density overlay from binned points.
///
/// Unlike the decision field this only looks at the points inside each cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityFieldBuilder;

impl DensityFieldBuilder {
    pub fn build<L, F>(bins: &HexBins<'_, L, F>) -> DensityField<L, F>
    where
        L: Clone + Eq + Debug,
        F: Float,
    {
        let mut cells = BTreeMap::new();
        for (cell, members) in bins.occupied() {
            let tally: Tally<'_, L> = bins.labels(cell.index).collect();
            if let Some((label, votes)) = tally.winner() {
                cells.insert(
                    cell.index,
                    DensityCell {
                        cell: *cell,
                        label: label.clone(),
                        count: members.len(),
                        votes,
                    },
                );
            }
        }
        log::trace!("density field: {} occupied cells", cells.len());
        DensityField { cells }
    }
}
