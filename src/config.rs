use crate::error::VisualizerError;
use crate::session::AnimationTarget;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Smallest value the driver may use for k or the display count.
pub const MIN_PARAM: usize = 1;

/// Largest value the driver may use for k or the display count.
pub const MAX_PARAM: usize = 100;

/// Configuration for a visualization session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct VisualizerConfig {
    /// Number of neighbors that vote for each cell
    pub k: usize,

    /// How many of the loaded points take part (a prefix of the dataset)
    pub display_count: usize,

    /// Circumradius of a hexagon, in data units (millimetres for bill measurements)
    pub radius: f64,

    /// Padding added around the data bounding box before tiling
    pub margin: f64,

    /// What the animation counter drives
    pub target: AnimationTarget,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            k: 1,
            display_count: MAX_PARAM,
            radius: 0.8,
            margin: 1.0,
            target: AnimationTarget::Both,
        }
    }
}

impl VisualizerConfig {
    /// Create a new configuration with the specified number of neighbors
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the number of displayed points
    pub fn with_display_count(mut self, display_count: usize) -> Self {
        self.display_count = display_count;
        self
    }

    /// Set the hexagon radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the margin around the data extent
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set what the animation counter drives
    pub fn with_target(mut self, target: AnimationTarget) -> Self {
        self.target = target;
        self
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), VisualizerError> {
        check_range("k", self.k)?;
        check_range("display_count", self.display_count)?;
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(VisualizerError::InvalidConfig("radius"));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(VisualizerError::InvalidConfig("margin"));
        }
        Ok(())
    }
}

pub(crate) fn check_range(name: &'static str, value: usize) -> Result<(), VisualizerError> {
    if (MIN_PARAM..=MAX_PARAM).contains(&value) {
        Ok(())
    } else {
        Err(VisualizerError::OutOfRange { name, value })
    }
}
