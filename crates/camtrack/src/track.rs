use std::collections::VecDeque;
use std::fmt;

use crate::{BoundingBox, Detection, MotionModel};
use ndarray::*;
use serde::{Serialize, Serializer};

/// Enumeration type for the single target track state:
///
/// - Newly created tracks are classified as `Tentative` until enough
///   evidence has been collected.
/// - Then, the track state is changed to `Confirmed` and the track is
///   reported to consumers.
/// - A confirmed track missing its detection becomes `Lost` and coasts on
///   prediction within the age-out window.
/// - Tracks that are no longer alive are classified as `Removed` to mark
///   them for eviction from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Tentative,
    Confirmed,
    Lost,
    Removed,
}

/// The association strategy that produced a track identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    /// Appearance-aware primary strategy.
    Appearance,
    /// Geometry-only fallback strategy.
    Geometry,
}

impl StrategyKind {
    /// Identifier namespace prefix, named for the association signal.
    pub fn prefix(&self) -> &'static str {
        match self {
            StrategyKind::Appearance => "deep",
            StrategyKind::Geometry => "iou",
        }
    }
}

/// A track identifier: strategy namespace plus a per-camera monotonically
/// increasing sequence number. Rendered as e.g. `deep-7` or `iou-7` so
/// downstream consumers can tell which strategy produced an identity
/// without reaching into tracker internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId {
    strategy: StrategyKind,
    seq: u64,
}

impl TrackId {
    pub(crate) fn new(strategy: StrategyKind, seq: u64) -> TrackId {
        TrackId { strategy, seq }
    }

    /// Returns the strategy namespace of the identifier
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Returns the per-camera sequence number of the identifier
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.strategy.prefix(), self.seq)
    }
}

impl Serialize for TrackId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One reported track, as handed to the downstream sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackOutput {
    pub id: TrackId,
    pub bbox: BoundingBox,
    pub class_label: Option<String>,
    pub age: usize,
}

/// A single target followed across frames.
///
/// Tracks are created, mutated, and destroyed only by their camera's
/// registry during a matching round.
#[derive(Debug, Clone)]
pub struct Track {
    /// Stable identifier for the object's lifetime on this camera.
    id: TrackId,
    /// The current track state.
    state: TrackState,
    /// Current box: the last matched detection box, or the prediction while
    /// the track is lost.
    bbox: BoundingBox,
    /// Center velocity estimate in pixels per frame.
    velocity: (f32, f32),
    /// Class label from the most recent matched detection.
    class_label: Option<String>,
    /// Recent appearance descriptors, oldest first.
    descriptor_history: VecDeque<Array1<f32>>,
    /// Capacity of the descriptor ring.
    history_depth: usize,
    /// Consecutive successful matches.
    hits: usize,
    /// Consecutive frames without a match.
    misses: usize,
    /// Total frames since first occurrence.
    age: usize,
}

impl Track {
    pub(crate) fn new(id: TrackId, detection: &Detection, history_depth: usize) -> Track {
        let mut track = Track {
            id,
            state: TrackState::Tentative,
            bbox: *detection.bbox(),
            velocity: (0.0, 0.0),
            class_label: detection.class_label().map(str::to_owned),
            descriptor_history: VecDeque::with_capacity(history_depth),
            history_depth,
            hits: 1,
            misses: 0,
            age: 1,
        };
        if let Some(descriptor) = detection.descriptor() {
            track.push_descriptor(descriptor.clone());
        }
        track
    }

    /// Return the identifier of the track
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Return the TrackState of the track
    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Return the current bounding box of the track
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Return the center velocity estimate of the track
    pub fn velocity(&self) -> (f32, f32) {
        self.velocity
    }

    /// Return the class label of the track
    pub fn class_label(&self) -> Option<&str> {
        self.class_label.as_deref()
    }

    /// Return the consecutive hit count of the track
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Return the consecutive miss count of the track
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Return the total number of frames since first occurrence
    pub fn age(&self) -> usize {
        self.age
    }

    /// Return the stored appearance descriptors, oldest first
    pub fn descriptor_history(&self) -> impl Iterator<Item = &Array1<f32>> {
        self.descriptor_history.iter()
    }

    /// Returns true if this track is tentative (unconfirmed).
    pub fn is_tentative(&self) -> bool {
        matches!(self.state, TrackState::Tentative)
    }

    /// Returns true if this track is confirmed.
    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, TrackState::Confirmed)
    }

    /// Returns true if this track is lost.
    pub fn is_lost(&self) -> bool {
        matches!(self.state, TrackState::Lost)
    }

    /// Returns true if this track is dead and should be evicted.
    pub fn is_removed(&self) -> bool {
        matches!(self.state, TrackState::Removed)
    }

    /// Build the sink-facing report row for this track.
    pub fn to_output(&self) -> TrackOutput {
        TrackOutput {
            id: self.id,
            bbox: self.bbox,
            class_label: self.class_label.clone(),
            age: self.age,
        }
    }

    fn push_descriptor(&mut self, descriptor: Array1<f32>) {
        if self.descriptor_history.len() == self.history_depth {
            self.descriptor_history.pop_front();
        }
        self.descriptor_history.push_back(descriptor);
    }

    /// Apply a successful match: refresh box, velocity, appearance history
    /// and class label, then run the `matched` lifecycle transition.
    pub(crate) fn apply_match(
        &mut self,
        detection: &Detection,
        motion: &MotionModel,
        n_init: usize,
    ) {
        let (prev_x, prev_y) = self.bbox.center();
        let (new_x, new_y) = detection.bbox().center();
        self.velocity = motion.blend_velocity(self.velocity, (new_x - prev_x, new_y - prev_y));
        self.bbox = *detection.bbox();

        if let Some(label) = detection.class_label() {
            self.class_label = Some(label.to_owned());
        }
        if let Some(descriptor) = detection.descriptor() {
            self.push_descriptor(descriptor.clone());
        }

        self.hits += 1;
        self.misses = 0;
        self.age += 1;
        self.state = match self.state {
            TrackState::Tentative if self.hits >= n_init => TrackState::Confirmed,
            TrackState::Tentative => TrackState::Tentative,
            // a lost track that matches again resumes with its identity
            TrackState::Confirmed | TrackState::Lost => TrackState::Confirmed,
            // removed tracks never re-enter a round
            TrackState::Removed => TrackState::Removed,
        };
    }

    /// Apply a miss: advance the box to its prediction and run the
    /// `unmatched` lifecycle transition.
    pub(crate) fn apply_miss(&mut self, predicted: BoundingBox, max_age: usize) {
        self.bbox = predicted;
        self.hits = 0;
        self.misses += 1;
        self.age += 1;
        self.state = match self.state {
            // no grace for unconfirmed tracks, detector noise would
            // otherwise churn identities
            TrackState::Tentative => TrackState::Removed,
            TrackState::Confirmed | TrackState::Lost if self.misses >= max_age => {
                TrackState::Removed
            }
            TrackState::Confirmed | TrackState::Lost => TrackState::Lost,
            TrackState::Removed => TrackState::Removed,
        };
    }
}
