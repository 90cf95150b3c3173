//! The animation driver.
//!
//! A [`Session`] owns the loaded dataset, the grid and the latest computed
//! fields. Parameter changes only queue a rebuild; [`Session::flush`] runs
//! the most recent request. A request queued while another is pending
//! replaces it, so the latest change always wins and no partial result is
//! ever merged.

use crate::config::{MAX_PARAM, MIN_PARAM, VisualizerConfig, check_range};
use crate::error::VisualizerError;
use crate::{FieldPair, recompute};
use hexbin::{Extent, HexGrid};
use hexknn_helpers::{Float, LabeledPoint};
use k_nn::KnnError;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Playback state of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
}

/// Which parameter the animation counter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum AnimationTarget {
    /// k and the display count both follow the counter.
    #[default]
    Both,
    /// Only k follows the counter; the display count stays fixed.
    K,
    /// Only the display count follows the counter; k stays fixed.
    DisplayCount,
}

/// The parameters of one rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildRequest {
    pub display_count: usize,
    pub k: usize,
}

/// An interactive visualization session.
#[derive(Debug, Clone)]
pub struct Session<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    points: Vec<LabeledPoint<L, F>>,
    grid: HexGrid<F>,
    target: AnimationTarget,
    state: PlayState,
    counter: usize,
    params: RebuildRequest,
    pending: Option<RebuildRequest>,
    applied: Option<RebuildRequest>,
    superseded: usize,
    fields: FieldPair<L, F>,
}

impl<L, F> Session<L, F>
where
    L: Clone + Eq + Debug,
    F: Float,
{
    /// Creates a session whose grid covers the loaded points plus the
    /// configured margin.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or when `points` holds
    /// no finite point to derive the extent from.
    pub fn new(
        points: Vec<LabeledPoint<L, F>>,
        config: VisualizerConfig,
    ) -> Result<Self, VisualizerError> {
        config.validate()?;
        let margin = F::cast(config.margin).ok_or(VisualizerError::InvalidConfig("margin"))?;
        let extent = Extent::from_points(&points, margin)?;
        Self::with_extent(points, extent, config)
    }

    /// Creates a session over a fixed extent, e.g. the axis domain chosen by
    /// the renderer. Works with an empty dataset.
    pub fn with_extent(
        points: Vec<LabeledPoint<L, F>>,
        extent: Extent<F>,
        config: VisualizerConfig,
    ) -> Result<Self, VisualizerError> {
        config.validate()?;
        let radius = F::cast(config.radius).ok_or(VisualizerError::InvalidConfig("radius"))?;
        let grid = HexGrid::new(extent, radius)?;

        let params = RebuildRequest {
            display_count: config.display_count,
            k: config.k,
        };
        let counter = match config.target {
            AnimationTarget::Both | AnimationTarget::K => config.k,
            AnimationTarget::DisplayCount => config.display_count,
        };
        log::debug!(
            "session: {} points, {} cells, target {:?}",
            points.len(),
            grid.len(),
            config.target
        );

        Ok(Self {
            points,
            grid,
            target: config.target,
            state: PlayState::Idle,
            counter,
            params,
            pending: Some(params),
            applied: None,
            superseded: 0,
            fields: FieldPair::empty(),
        })
    }

    pub fn points(&self) -> &[LabeledPoint<L, F>] {
        &self.points
    }

    pub fn grid(&self) -> &HexGrid<F> {
        &self.grid
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    /// The parameters the next rebuild will use.
    pub fn params(&self) -> RebuildRequest {
        self.params
    }

    pub fn pending(&self) -> Option<RebuildRequest> {
        self.pending
    }

    /// Parameters of the fields currently on display, if any were computed.
    pub fn applied(&self) -> Option<RebuildRequest> {
        self.applied
    }

    /// Number of requests replaced before they ran.
    pub fn superseded(&self) -> usize {
        self.superseded
    }

    /// The latest successfully computed fields.
    pub fn fields(&self) -> &FieldPair<L, F> {
        &self.fields
    }

    pub fn play(&mut self) {
        if self.counter >= MAX_PARAM {
            self.seek(MIN_PARAM);
        }
        self.state = PlayState::Playing;
    }

    pub fn pause(&mut self) {
        self.state = PlayState::Idle;
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlayState::Idle => self.play(),
            PlayState::Playing => self.pause(),
        }
    }

    /// Advances the counter by one while playing. Playback stops on its own
    /// once the counter reaches [`MAX_PARAM`].
    ///
    /// Returns whether the counter moved.
    pub fn tick(&mut self) -> bool {
        if self.state != PlayState::Playing {
            return false;
        }
        if self.counter >= MAX_PARAM {
            self.state = PlayState::Idle;
            return false;
        }
        self.seek(self.counter + 1);
        if self.counter >= MAX_PARAM {
            self.state = PlayState::Idle;
        }
        true
    }

    /// Moves the counter by `delta` (clamped to the interactive range) and
    /// pauses playback.
    pub fn step(&mut self, delta: isize) {
        self.state = PlayState::Idle;
        let next = self.counter.saturating_add_signed(delta);
        self.seek(next);
    }

    /// Moves the counter to `value`, clamped to the interactive range.
    pub fn seek(&mut self, value: usize) {
        self.counter = value.clamp(MIN_PARAM, MAX_PARAM);
        let mut params = self.params;
        match self.target {
            AnimationTarget::Both => {
                params.k = self.counter;
                params.display_count = self.counter;
            }
            AnimationTarget::K => params.k = self.counter,
            AnimationTarget::DisplayCount => params.display_count = self.counter,
        }
        self.request(params);
    }

    /// Sets k directly, independent of the animation target.
    pub fn set_k(&mut self, k: usize) -> Result<(), VisualizerError> {
        check_range("k", k)?;
        self.request(RebuildRequest { k, ..self.params });
        Ok(())
    }

    /// Sets the display count directly, independent of the animation target.
    pub fn set_display_count(&mut self, display_count: usize) -> Result<(), VisualizerError> {
        check_range("display_count", display_count)?;
        self.request(RebuildRequest {
            display_count,
            ..self.params
        });
        Ok(())
    }

    fn request(&mut self, params: RebuildRequest) {
        self.params = params;
        if let Some(old) = self.pending.replace(params) {
            if old != params {
                log::trace!("rebuild {:?} superseded by {:?}", old, params);
                self.superseded += 1;
            }
        }
    }

    /// Drops the pending rebuild without running it.
    pub fn cancel(&mut self) -> Option<RebuildRequest> {
        self.pending.take()
    }

    /// Runs the pending rebuild, if any.
    ///
    /// Returns `Ok(true)` when new fields were installed. A request matching
    /// the fields already on display is skipped. When the displayed point
    /// set is empty the previous fields stay in place and `Ok(false)` is
    /// returned.
    pub fn flush(&mut self) -> Result<bool, VisualizerError> {
        let Some(request) = self.pending.take() else {
            return Ok(false);
        };
        if self.applied == Some(request) {
            return Ok(false);
        }

        match recompute(&self.grid, &self.points, request.display_count, request.k) {
            Ok(fields) => {
                log::debug!(
                    "rebuilt fields: display_count={}, k={}, {} occupied cells",
                    request.display_count,
                    request.k,
                    fields.density.len()
                );
                self.fields = fields;
                self.applied = Some(request);
                Ok(true)
            }
            Err(VisualizerError::Knn(KnnError::InsufficientData)) => {
                log::warn!(
                    "no points to classify for {:?}, keeping previous fields",
                    request
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Advances one animation frame: `tick` followed by `flush`.
    pub fn frame(&mut self) -> Result<bool, VisualizerError> {
        self.tick();
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn penguins() -> Vec<LabeledPoint<String, f64>> {
        [
            (39.1, 18.7, "Adelie"),
            (39.5, 17.4, "Adelie"),
            (40.3, 18.0, "Adelie"),
            (46.1, 13.2, "Gentoo"),
            (50.0, 16.3, "Gentoo"),
            (46.5, 17.9, "Chinstrap"),
            (50.0, 19.5, "Chinstrap"),
        ]
        .into_iter()
        .map(|(x, y, s)| LabeledPoint::new(x, y, s.to_string()))
        .collect()
    }

    fn session(target: AnimationTarget) -> Session<String, f64> {
        let config = VisualizerConfig::new(1)
            .with_display_count(1)
            .with_radius(1.0)
            .with_target(target);
        Session::new(penguins(), config).unwrap()
    }

    #[test]
    fn test_initial_request_is_pending() {
        let mut s = session(AnimationTarget::Both);
        assert_eq!(s.state(), PlayState::Idle);
        assert!(s.fields().decision.is_empty());
        assert_eq!(
            s.pending(),
            Some(RebuildRequest {
                display_count: 1,
                k: 1
            })
        );
        assert!(s.flush().unwrap());
        assert_eq!(s.fields().decision.len(), s.grid().len());
        assert_eq!(s.fields().density.total_points(), 1);
    }

    #[test]
    fn test_latest_request_wins() {
        let mut s = session(AnimationTarget::Both);
        s.flush().unwrap();

        s.seek(3);
        s.seek(5);
        s.set_k(2).unwrap();
        assert_eq!(s.superseded(), 2);

        assert!(s.flush().unwrap());
        assert_eq!(
            s.applied(),
            Some(RebuildRequest {
                display_count: 5,
                k: 2
            })
        );
        assert_eq!(s.fields().k, 2);
        assert_eq!(s.fields().display_count, 5);
        // Nothing left to do.
        assert!(!s.flush().unwrap());
    }

    #[test]
    fn test_cancelled_request_never_runs() {
        let mut s = session(AnimationTarget::Both);
        s.flush().unwrap();
        s.seek(4);
        assert!(s.cancel().is_some());
        assert!(!s.flush().unwrap());
        assert_eq!(s.fields().k, 1);
    }

    #[test]
    fn test_unchanged_request_is_skipped() {
        let mut s = session(AnimationTarget::Both);
        s.flush().unwrap();
        s.seek(1);
        assert!(!s.flush().unwrap());
    }

    #[test]
    fn test_playback_stops_at_max() {
        let mut s = session(AnimationTarget::K);
        s.play();
        let mut frames = 0;
        while s.state() == PlayState::Playing {
            assert!(s.frame().is_ok());
            frames += 1;
        }
        assert_eq!(frames, MAX_PARAM - 1);
        assert_eq!(s.counter(), MAX_PARAM);
        assert!(!s.tick());

        // Playing again restarts from the beginning.
        s.play();
        assert_eq!(s.counter(), MIN_PARAM);
    }

    #[test]
    fn test_targets_drive_different_params() {
        let mut s = session(AnimationTarget::K);
        s.seek(6);
        assert_eq!(s.params(), RebuildRequest { display_count: 1, k: 6 });

        let mut s = session(AnimationTarget::DisplayCount);
        s.seek(6);
        assert_eq!(s.params(), RebuildRequest { display_count: 6, k: 1 });

        let mut s = session(AnimationTarget::Both);
        s.seek(6);
        assert_eq!(s.params(), RebuildRequest { display_count: 6, k: 6 });
    }

    #[test]
    fn test_step_pauses_and_clamps() {
        let mut s = session(AnimationTarget::Both);
        s.play();
        s.step(-5);
        assert_eq!(s.state(), PlayState::Idle);
        assert_eq!(s.counter(), MIN_PARAM);
        s.step(500);
        assert_eq!(s.counter(), MAX_PARAM);
        s.toggle();
        assert_eq!(s.state(), PlayState::Playing);
        assert_eq!(s.counter(), MIN_PARAM);
    }

    #[test]
    fn test_out_of_range_setters() {
        let mut s = session(AnimationTarget::Both);
        assert_eq!(
            s.set_k(0),
            Err(VisualizerError::OutOfRange { name: "k", value: 0 })
        );
        assert!(s.set_display_count(101).is_err());
    }

    #[test]
    fn test_empty_dataset_keeps_empty_fields() {
        let extent = Extent::new(30.0, 12.0, 60.0, 22.0).unwrap();
        let mut s: Session<String, f64> =
            Session::with_extent(Vec::new(), extent, VisualizerConfig::default()).unwrap();
        assert!(!s.flush().unwrap());
        assert!(s.fields().decision.is_empty());
        assert!(s.fields().density.is_empty());
        assert_eq!(s.applied(), None);
    }

    #[test]
    fn test_empty_dataset_cannot_derive_extent() {
        let result: Result<Session<String, f64>, _> =
            Session::new(Vec::new(), VisualizerConfig::default());
        assert!(matches!(
            result,
            Err(VisualizerError::Hexbin(hexbin::HexbinError::EmptyExtent))
        ));
    }
}
