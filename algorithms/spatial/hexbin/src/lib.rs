//! Hexagonal binning of the plane.
//!
//! [`HexGrid`] tiles a rectangular [`Extent`] with pointy-top hexagons in the
//! conventional hexbin layout: columns are `radius * sqrt(3)` apart, rows are
//! `1.5 * radius` apart and every odd row is shifted right by half a column.
//! The lattice is anchored at the origin, so row `j` sits at `y = j * dy`
//! and its centers at `x = i * dx + (j & 1) * dx / 2`; the grid holds the
//! lattice points that cover the extent. Cells are kept in row-major order
//! (bottom row first) and that order is the iteration order of everything
//! built on top of the grid.

use hexknn_helpers::{Float, LabeledPoint, PointSet};
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::fmt::Debug;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

mod bins;

pub use bins::HexBins;

/// Upper bound on the number of cells a grid may hold.
pub const MAX_CELLS: usize = 250_000;

/// Errors that can occur when building a hexagonal grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexbinError {
    /// The cell radius must be finite and strictly positive
    #[error("hexagon radius must be finite and positive")]
    InvalidRadius,
    /// Extent bounds must be finite with min <= max
    #[error("extent bounds must be finite with min <= max")]
    InvalidExtent,
    /// No finite point to derive an extent from
    #[error("cannot derive an extent from an empty point list")]
    EmptyExtent,
    /// The radius is too small for the extent
    #[error("grid would need about {0} cells (limit {})", MAX_CELLS)]
    TooManyCells(usize),
    /// The extent is too narrow to hold a single lattice point
    #[error("extent is too small for the hexagon radius")]
    NoCells,
}

/// Rounds half towards positive infinity (`-2.5` becomes `-2`).
fn round_half_up<F: Float>(v: F) -> F {
    (v + F::one() / (F::one() + F::one())).floor()
}

fn is_odd<F: Float>(j: F) -> bool {
    j % (F::one() + F::one()) != F::zero()
}

/// An axis-aligned rectangle in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Extent<F> {
    pub min_x: F,
    pub min_y: F,
    pub max_x: F,
    pub max_y: F,
}

impl<F: Float> Extent<F> {
    /// # Errors
    ///
    /// Returns `HexbinError::InvalidExtent` for non-finite bounds or when a
    /// minimum exceeds its maximum.
    pub fn new(min_x: F, min_y: F, max_x: F, max_y: F) -> Result<Self, HexbinError> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x > max_x || min_y > max_y {
            return Err(HexbinError::InvalidExtent);
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// The bounding box of all finite points, grown by `margin` on every side.
    ///
    /// # Errors
    ///
    /// Returns `HexbinError::EmptyExtent` when no point has finite coordinates
    /// and `HexbinError::InvalidExtent` for a negative or non-finite margin.
    pub fn from_points<L>(points: &[LabeledPoint<L, F>], margin: F) -> Result<Self, HexbinError>
    where
        L: Clone + Eq + Debug,
    {
        if !margin.is_finite() || margin < F::zero() {
            return Err(HexbinError::InvalidExtent);
        }
        let mut finite = points.iter().filter(|p| p.is_finite());
        let first = finite.next().ok_or(HexbinError::EmptyExtent)?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in finite {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x - margin, min_y - margin, max_x + margin, max_y + margin)
    }

    pub fn width(&self) -> F {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> F {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: F, y: F) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Moves `(x, y)` onto the nearest location inside the extent.
    pub fn clamp(&self, x: F, y: F) -> (F, F) {
        (
            x.max(self.min_x).min(self.max_x),
            y.max(self.min_y).min(self.max_y),
        )
    }
}

/// One hexagon of a [`HexGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct HexCell<F> {
    /// Position in the grid's row-major order.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub center_x: F,
    pub center_y: F,
}

/// A hexagonal tiling covering an [`Extent`].
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid<F: Float> {
    extent: Extent<F>,
    radius: F,
    dx: F,
    dy: F,
    /// Lattice row and column of `cells[0]`.
    row_origin: F,
    col_origin: F,
    cells: Vec<HexCell<F>>,
    /// `centers[[i, 0]]`, `centers[[i, 1]]` is the center of `cells[i]`.
    centers: Array2<F>,
    /// Index of the first cell of each row, plus one trailing entry.
    row_start: Vec<usize>,
}

impl<F: Float> HexGrid<F> {
    /// Tiles `extent` with hexagons of circumradius `radius`.
    ///
    /// The first row is lattice row `j0 = round(min_y / dy)` and each row
    /// starts at lattice column `i0 = round(min_x / dx)`. Rows continue while
    /// `y < max_y + radius`; within a row, centers continue while
    /// `x < max_x + dx / 2`. Identical arguments always give identical
    /// cells in identical order.
    ///
    /// # Errors
    ///
    /// Returns `HexbinError::InvalidRadius` for a non-finite or non-positive
    /// radius, `HexbinError::TooManyCells` when the tiling would exceed
    /// [`MAX_CELLS`] and `HexbinError::NoCells` when no lattice point falls
    /// inside the bounds.
    pub fn new(extent: Extent<F>, radius: F) -> Result<Self, HexbinError> {
        if !radius.is_finite() || radius <= F::zero() {
            return Err(HexbinError::InvalidRadius);
        }

        let two = F::one() + F::one();
        let three = two + F::one();
        let dx = radius * three.sqrt();
        let dy = radius * three / two;
        let half_dx = dx / two;

        let estimate: usize =
            ((extent.width() / dx + two) * (extent.height() / dy + three)).as_();
        if estimate > MAX_CELLS {
            return Err(HexbinError::TooManyCells(estimate));
        }

        let row_origin = round_half_up(extent.min_y / dy);
        let col_origin = round_half_up(extent.min_x / dx);

        let mut cells = Vec::with_capacity(estimate);
        let mut row_start = vec![0];
        let mut j = row_origin;
        let mut row = 0;
        while j * dy < extent.max_y + radius {
            let y = j * dy;
            let shift = if is_odd(j) { half_dx } else { F::zero() };
            let mut i = col_origin;
            let mut col = 0;
            while i * dx + shift < extent.max_x + half_dx {
                cells.push(HexCell {
                    index: cells.len(),
                    row,
                    col,
                    center_x: i * dx + shift,
                    center_y: y,
                });
                i += F::one();
                col += 1;
            }
            row_start.push(cells.len());
            j += F::one();
            row += 1;
        }
        if cells.is_empty() {
            return Err(HexbinError::NoCells);
        }

        let mut centers = Array2::zeros((cells.len(), 2));
        for cell in &cells {
            centers[[cell.index, 0]] = cell.center_x;
            centers[[cell.index, 1]] = cell.center_y;
        }

        log::debug!(
            "built hex grid: {} rows, {} cells, radius {:?}",
            row,
            cells.len(),
            radius
        );

        Ok(Self {
            extent,
            radius,
            dx,
            dy,
            row_origin,
            col_origin,
            cells,
            centers,
            row_start,
        })
    }

    pub fn extent(&self) -> &Extent<F> {
        &self.extent
    }

    pub fn radius(&self) -> F {
        self.radius
    }

    /// Horizontal distance between neighboring centers of one row.
    pub fn column_spacing(&self) -> F {
        self.dx
    }

    /// Vertical distance between rows.
    pub fn row_spacing(&self) -> F {
        self.dy
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.row_start.len() - 1
    }

    pub fn cells(&self) -> &[HexCell<F>] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&HexCell<F>> {
        self.cells.get(index)
    }

    /// All cell centers as an `n x 2` matrix in cell order.
    pub fn centers(&self) -> ArrayView2<'_, F> {
        self.centers.view()
    }

    /// The six corners of a cell, clockwise from the top vertex.
    pub fn hexagon(&self, index: usize) -> Option<[(F, F); 6]> {
        let cell = self.cells.get(index)?;
        let (cx, cy) = (cell.center_x, cell.center_y);
        let two = F::one() + F::one();
        let (w, h) = (self.dx / two, self.radius / two);
        Some([
            (cx, cy + self.radius),
            (cx + w, cy + h),
            (cx + w, cy - h),
            (cx, cy - self.radius),
            (cx - w, cy - h),
            (cx - w, cy + h),
        ])
    }

    fn row_len(&self, row: usize) -> usize {
        self.row_start[row + 1] - self.row_start[row]
    }

    fn rdistance(&self, index: usize, x: F, y: F) -> F {
        let center: ArrayView1<F> = self.centers.row(index);
        let (ex, ey) = (center[0] - x, center[1] - y);
        ex * ex + ey * ey
    }

    /// Index of the cell whose center is nearest to `(x, y)`.
    ///
    /// The point is first clamped into the extent. Lattice rounding
    /// (`j = round(y / dy)`, `i = round(x / dx - (j & 1) / 2)`) picks a
    /// candidate cell, then the candidate and its lattice neighbors are
    /// compared by Euclidean distance. Among equidistant centers the lowest
    /// index wins. Returns `None` only for non-finite input.
    pub fn locate(&self, x: F, y: F) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (x, y) = self.extent.clamp(x, y);
        let half = F::one() / (F::one() + F::one());

        let j = round_half_up(y / self.dy);
        let row: usize = (j - self.row_origin).max(F::zero()).as_();
        let row = row.min(self.rows() - 1);
        let j = self.row_origin + F::cast(row)?;
        let shift = if is_odd(j) { half } else { F::zero() };
        let i = round_half_up(x / self.dx - shift);
        let col: usize = (i - self.col_origin).max(F::zero()).as_();

        let mut best: Option<(F, usize)> = None;
        for r in row.saturating_sub(1)..=(row + 1).min(self.rows() - 1) {
            let len = self.row_len(r);
            if len == 0 {
                continue;
            }
            let c_hi = (col + 1).min(len - 1);
            let c_lo = col.saturating_sub(1).min(c_hi);
            for c in c_lo..=c_hi {
                let index = self.row_start[r] + c;
                let d = self.rdistance(index, x, y);
                best = match best {
                    Some((bd, bi)) if bd < d || (bd == d && bi < index) => Some((bd, bi)),
                    _ => Some((d, index)),
                };
            }
        }
        best.map(|(_, index)| index)
    }

    /// Assigns every point of `points` to exactly one cell.
    pub fn assign_bins<'a, L>(&'a self, points: &'a PointSet<L, F>) -> HexBins<'a, L, F>
    where
        L: Clone + Eq + Debug,
    {
        HexBins::new(self, points)
    }
}
