use crate::{
    appearance::{AppearanceMetric, MAX_DISTANCE},
    config::TrackerConfig,
    iou_matching, linear_assignment,
    linear_assignment::AssignmentOutcome,
    track::{StrategyKind, TrackId, TrackOutput},
    BoundingBox, Detection, Error, MotionModel, Track,
};
use ndarray::*;
use tracing::{debug, error, trace, warn};

/// Association strategy bound to one camera, selected once at tracker
/// creation and fixed for the camera's lifetime.
#[derive(Debug, Clone)]
enum Strategy {
    /// Combined appearance and geometry cost (primary).
    Appearance(AppearanceMetric),
    /// IoU-only cost (fallback).
    Geometry,
}

impl Strategy {
    fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Appearance(_) => StrategyKind::Appearance,
            Strategy::Geometry => StrategyKind::Geometry,
        }
    }
}

/// Per-camera multi-target tracker: the track registry plus one matching
/// round per frame.
///
/// Frames for a camera must be fed in arrival order by a single logical
/// pipeline; out-of-order delivery corrupts velocity estimation and is not
/// compensated for here.
///
/// # Examples
///
/// ```
/// use camtrack::{BoundingBox, CameraTracker, Detection, TrackerConfig};
///
/// let mut tracker = CameraTracker::new("front_door", TrackerConfig::default());
///
/// let detection = Detection::new(
///     None,
///     BoundingBox::from_corners(10.0, 10.0, 60.0, 120.0),
///     0.9,
///     Some("person".to_owned()),
///     Some(vec![0.0; 128]),
/// );
///
/// let reported = tracker.process(vec![detection]).unwrap();
/// // a brand-new track is tentative, nothing is reported yet
/// assert!(reported.is_empty());
/// ```
#[derive(Debug)]
pub struct CameraTracker {
    camera_id: String,
    config: TrackerConfig,
    strategy: Strategy,
    motion: MotionModel,
    /// Active and lost tracks, in insertion order (ascending id).
    tracks: Vec<Track>,
    /// Used to allocate identifiers to new tracks. Never reused within a
    /// camera session.
    next_seq: u64,
}

impl CameraTracker {
    /// Returns a new CameraTracker.
    ///
    /// The association strategy is decided here, once: if the appearance
    /// metric cannot be initialized the camera silently degrades to
    /// geometry-only association for its entire session, logged a single
    /// time.
    pub fn new(camera_id: impl Into<String>, config: TrackerConfig) -> CameraTracker {
        let camera_id = camera_id.into();
        let strategy = match AppearanceMetric::try_new(&config.appearance) {
            Ok(metric) => {
                debug!(camera = %camera_id, "appearance matching enabled");
                Strategy::Appearance(metric)
            }
            Err(err) => {
                warn!(camera = %camera_id, %err, "falling back to IoU-only association");
                Strategy::Geometry
            }
        };
        let motion = MotionModel::new(config.velocity_smoothing);
        CameraTracker {
            camera_id,
            config,
            strategy,
            motion,
            tracks: vec![],
            next_seq: 1,
        }
    }

    /// Return the camera identifier
    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    /// Return the strategy bound to this camera
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Return all tracks currently in the registry
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Run one matching round against this camera's registry.
    ///
    /// Malformed detections are dropped from the round; unmatched
    /// detections below the confidence threshold are dropped silently.
    /// Returns the confirmed tracks. The only error is a registry
    /// inconsistency, in which case the registry keeps its pre-round state
    /// and the frame is not processed.
    pub fn process(&mut self, detections: Vec<Detection>) -> Result<Vec<TrackOutput>, Error> {
        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|detection| {
                if detection.bbox().is_valid() {
                    true
                } else {
                    debug!(
                        camera = %self.camera_id,
                        detection = %detection.id(),
                        bbox = ?detection.bbox(),
                        "dropping malformed detection"
                    );
                    false
                }
            })
            .collect();

        let predicted: Vec<BoundingBox> = self
            .tracks
            .iter()
            .map(|track| self.motion.predicted_box(track.bbox(), track.velocity()))
            .collect();

        let costs = self.cost_matrix(&predicted, &detections);
        let outcome = linear_assignment::min_cost_matching(&costs, self.config.cost_ceiling);

        // nothing has been mutated yet: an invalid outcome aborts the round
        // with the registry still in its pre-round state
        self.check_round_partition(&outcome, detections.len())?;

        for m in &outcome.matches {
            self.tracks[m.track_idx].apply_match(
                &detections[m.detection_idx],
                &self.motion,
                self.config.n_init,
            );
        }
        for &track_idx in &outcome.unmatched_tracks {
            self.tracks[track_idx].apply_miss(predicted[track_idx], self.config.max_age);
        }

        let camera_id = &self.camera_id;
        self.tracks.retain(|track| {
            if track.is_removed() {
                debug!(camera = %camera_id, track = %track.id(), "evicting track");
                false
            } else {
                true
            }
        });

        for (idx, detection) in detections.into_iter().enumerate() {
            if outcome.unmatched_detections.binary_search(&idx).is_err() {
                continue;
            }
            if detection.confidence() >= self.config.min_confidence {
                self.spawn_track(&detection);
            } else {
                trace!(
                    camera = %self.camera_id,
                    confidence = detection.confidence(),
                    "detection below spawn threshold"
                );
            }
        }

        Ok(self
            .tracks
            .iter()
            .filter(|track| track.is_confirmed())
            .map(Track::to_output)
            .collect())
    }

    /// Build the gated association cost matrix for this round.
    ///
    /// Rows are tracks in registry order, columns detections in arrival
    /// order. Pairs below the IoU gate are marked infeasible no matter how
    /// similar they look; the cost ceiling is enforced by the solver.
    fn cost_matrix(&self, predicted: &[BoundingBox], detections: &[Detection]) -> Array2<f32> {
        let detection_boxes: Vec<BoundingBox> =
            detections.iter().map(|d| *d.bbox()).collect();
        let mut costs = iou_matching::iou_cost_matrix(predicted, &detection_boxes);

        let iou_gate = self.config.iou_gate;
        let weight = self.config.appearance.weight;
        for ((track_idx, detection_idx), cost) in costs.indexed_iter_mut() {
            let iou = 1.0 - *cost;
            if iou < iou_gate {
                *cost = f32::INFINITY;
                continue;
            }
            if let Strategy::Appearance(metric) = &self.strategy {
                let appearance = metric.distance(
                    self.tracks[track_idx].descriptor_history(),
                    detections[detection_idx].descriptor(),
                );
                debug_assert!(appearance <= MAX_DISTANCE);
                *cost = weight * appearance + (1.0 - weight) * *cost;
            }
        }
        costs
    }

    /// Verify the assignment outcome is an exact partition of the round's
    /// tracks and detections. A violation here means the registry and the
    /// matcher disagree about what exists; the frame must not be committed.
    fn check_round_partition(
        &self,
        outcome: &AssignmentOutcome,
        n_detections: usize,
    ) -> Result<(), Error> {
        let inconsistency = |detail: String| {
            error!(camera = %self.camera_id, %detail, "registry inconsistency, aborting round");
            Err(Error::RegistryInconsistency {
                camera_id: self.camera_id.clone(),
                detail,
            })
        };

        let mut tracks_seen = vec![false; self.tracks.len()];
        let mut detections_seen = vec![false; n_detections];
        for m in &outcome.matches {
            match tracks_seen.get_mut(m.track_idx) {
                Some(seen @ false) => *seen = true,
                Some(true) => return inconsistency(format!("track {} matched twice", m.track_idx)),
                None => {
                    return inconsistency(format!("match references unknown track {}", m.track_idx))
                }
            }
            match detections_seen.get_mut(m.detection_idx) {
                Some(seen @ false) => *seen = true,
                Some(true) => {
                    return inconsistency(format!("detection {} matched twice", m.detection_idx))
                }
                None => {
                    return inconsistency(format!(
                        "match references unknown detection {}",
                        m.detection_idx
                    ))
                }
            }
        }
        for &track_idx in &outcome.unmatched_tracks {
            match tracks_seen.get_mut(track_idx) {
                Some(seen @ false) => *seen = true,
                _ => {
                    return inconsistency(format!(
                        "duplicate or unknown track {track_idx} in unmatched set"
                    ))
                }
            }
        }
        for &detection_idx in &outcome.unmatched_detections {
            match detections_seen.get_mut(detection_idx) {
                Some(seen @ false) => *seen = true,
                _ => {
                    return inconsistency(format!(
                        "duplicate or unknown detection {detection_idx} in unmatched set"
                    ))
                }
            }
        }
        if let Some(track_idx) = tracks_seen.iter().position(|seen| !seen) {
            return inconsistency(format!("track {track_idx} missing from round outcome"));
        }
        if let Some(detection_idx) = detections_seen.iter().position(|seen| !seen) {
            return inconsistency(format!(
                "detection {detection_idx} missing from round outcome"
            ));
        }
        Ok(())
    }

    fn spawn_track(&mut self, detection: &Detection) {
        let id = TrackId::new(self.strategy.kind(), self.next_seq);
        self.next_seq += 1;
        trace!(camera = %self.camera_id, track = %id, "spawning tentative track");
        self.tracks
            .push(Track::new(id, detection, self.config.appearance.history_depth));
    }
}
