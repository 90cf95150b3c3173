use crate::Float;
use ndarray::{ArrayView1, Zip};

/// A distance metric between two feature vectors.
///
/// `rdistance` is a "relative" distance that preserves the ordering of
/// `distance` but may be cheaper to compute (for Euclidean distance it skips
/// the square root). Use it whenever only comparisons matter.
pub trait Distance<F: Float> {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F;

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.distance(a, b)
    }

    /// Converts a relative distance back into a true distance.
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    #[inline]
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.rdistance(a, b).sqrt()
    }

    #[inline]
    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a).and(&b).fold(F::zero(), |acc, &x, &y| {
            let d = x - y;
            acc + d * d
        })
    }

    #[inline]
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }
}
