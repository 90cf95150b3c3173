use crate::{HexCell, HexGrid};
use hexknn_helpers::{Float, PointSet};
use std::fmt::Debug;

/// Points of a [`PointSet`] grouped by the grid cell they fall in.
///
/// Each cell keeps the indices of its points in `PointSet` order.
#[derive(Debug, Clone)]
pub struct HexBins<'a, L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    grid: &'a HexGrid<F>,
    points: &'a PointSet<L, F>,
    members: Vec<Vec<usize>>,
}

impl<'a, L, F> HexBins<'a, L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    pub(crate) fn new(grid: &'a HexGrid<F>, points: &'a PointSet<L, F>) -> Self {
        let mut members = vec![Vec::new(); grid.len()];
        for (i, row) in points.coords().rows().into_iter().enumerate() {
            // PointSet coordinates are always finite, so locate cannot miss.
            if let Some(cell) = grid.locate(row[0], row[1]) {
                members[cell].push(i);
            }
        }
        log::trace!(
            "binned {} points into {} occupied cells",
            points.len(),
            members.iter().filter(|m| !m.is_empty()).count()
        );
        Self {
            grid,
            points,
            members,
        }
    }

    pub fn grid(&self) -> &'a HexGrid<F> {
        self.grid
    }

    pub fn points(&self) -> &'a PointSet<L, F> {
        self.points
    }

    /// Indices (into the point set) of the points in cell `index`.
    pub fn members(&self, index: usize) -> &[usize] {
        self.members.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Labels of the points in cell `index`, in point set order.
    pub fn labels(&self, index: usize) -> impl Iterator<Item = &'a L> + '_ {
        let labels = self.points.labels();
        self.members(index).iter().map(move |&i| &labels[i])
    }

    /// Cells holding at least one point, in grid order.
    pub fn occupied(&self) -> impl Iterator<Item = (&'a HexCell<F>, &[usize])> + '_ {
        self.grid
            .cells()
            .iter()
            .zip(&self.members)
            .filter(|(_, m)| !m.is_empty())
            .map(|(cell, m)| (cell, m.as_slice()))
    }

    /// Total number of binned points.
    pub fn total(&self) -> usize {
        self.members.iter().map(Vec::len).sum()
    }
}
