use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{CameraTracker, Detection, Error, TrackOutput, TrackerConfig};
use tracing::info;

/// Owns one tracker per camera identifier.
///
/// The camera map is the only structure touched by more than one camera's
/// pipeline; its lock covers lookup, insert-if-absent and removal only.
/// Each tracker sits behind its own lock, uncontended as long as the caller
/// honors the one-pipeline-per-camera discipline. Cleanup is fully
/// explicit: call [`TrackerManager::release`] when a camera's stream stops,
/// or its track state (including appearance history) stays resident.
#[derive(Debug)]
pub struct TrackerManager {
    config: TrackerConfig,
    trackers: Mutex<HashMap<String, Arc<Mutex<CameraTracker>>>>,
}

impl TrackerManager {
    /// Returns a new TrackerManager.
    ///
    /// The configuration is validated once here; every camera tracker
    /// created by this manager shares it.
    pub fn new(config: TrackerConfig) -> Result<TrackerManager, Error> {
        config.validate()?;
        Ok(TrackerManager {
            config,
            trackers: Mutex::new(HashMap::new()),
        })
    }

    /// Return the tracker bound to `camera_id`, creating it on first use.
    ///
    /// The association strategy (primary or fallback) is decided at
    /// creation and fixed for the camera's session; subsequent calls return
    /// the same tracker and registry.
    pub fn tracker(&self, camera_id: &str) -> Arc<Mutex<CameraTracker>> {
        let mut trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        trackers
            .entry(camera_id.to_owned())
            .or_insert_with(|| {
                info!(camera = camera_id, "creating camera tracker");
                Arc::new(Mutex::new(CameraTracker::new(camera_id, self.config.clone())))
            })
            .clone()
    }

    /// Run one matching round for `camera_id` and return the confirmed
    /// tracks for this frame.
    pub fn process_frame(
        &self,
        camera_id: &str,
        detections: Vec<Detection>,
    ) -> Result<Vec<TrackOutput>, Error> {
        let tracker = self.tracker(camera_id);
        let mut tracker = tracker.lock().unwrap_or_else(PoisonError::into_inner);
        tracker.process(detections)
    }

    /// Discard the tracker for `camera_id` along with all of its tracks.
    ///
    /// Returns whether a tracker existed. A later [`TrackerManager::tracker`]
    /// call starts the camera from scratch, with a fresh strategy decision
    /// and identifier sequence.
    pub fn release(&self, camera_id: &str) -> bool {
        let mut trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        let released = trackers.remove(camera_id).is_some();
        if released {
            info!(camera = camera_id, "released camera tracker");
        }
        released
    }

    /// Camera identifiers with an active tracker, sorted.
    pub fn active_cameras(&self) -> Vec<String> {
        let trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cameras: Vec<String> = trackers.keys().cloned().collect();
        cameras.sort_unstable();
        cameras
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use anyhow::Result;
    use std::sync::Arc;

    fn fallback_config() -> TrackerConfig {
        TrackerConfig {
            appearance: AppearanceConfig {
                enabled: false,
                ..AppearanceConfig::default()
            },
            ..TrackerConfig::default()
        }
    }

    fn det(x: f32, y: f32) -> Detection {
        Detection::new(
            None,
            BoundingBox::new(x, y, 10.0, 10.0),
            0.9,
            Some("person".to_owned()),
            None,
        )
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TrackerConfig {
            n_init: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            TrackerManager::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn same_camera_reuses_the_same_tracker() -> Result<()> {
        let manager = TrackerManager::new(TrackerConfig::default())?;
        let a = manager.tracker("front_door");
        let b = manager.tracker("front_door");
        assert!(Arc::ptr_eq(&a, &b));

        let other = manager.tracker("driveway");
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(
            manager.active_cameras(),
            vec!["driveway".to_owned(), "front_door".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn cameras_track_independently() -> Result<()> {
        let manager = TrackerManager::new(fallback_config())?;
        for _ in 0..3 {
            manager.process_frame("a", vec![det(0.0, 0.0)])?;
            manager.process_frame("b", vec![det(100.0, 100.0)])?;
        }
        // identifier sequences are per camera, not shared
        let a = manager.process_frame("a", vec![det(0.0, 0.0)])?;
        let b = manager.process_frame("b", vec![det(100.0, 100.0)])?;
        assert_eq!(a[0].id.to_string(), "iou-1");
        assert_eq!(b[0].id.to_string(), "iou-1");
        Ok(())
    }

    #[test]
    fn fallback_camera_release_and_fresh_session() -> Result<()> {
        let manager = TrackerManager::new(fallback_config())?;

        for _ in 0..3 {
            manager.process_frame("C", vec![det(0.0, 0.0)])?;
        }
        {
            let tracker = manager.tracker("C");
            let tracker = tracker.lock().unwrap();
            assert_eq!(tracker.strategy_kind(), StrategyKind::Geometry);
            assert_eq!(tracker.tracks()[0].id().to_string(), "iou-1");
        }

        assert!(manager.release("C"));
        assert!(!manager.release("C"));

        // the fresh session has no memory of prior tracks
        let tracker = manager.tracker("C");
        let tracker = tracker.lock().unwrap();
        assert!(tracker.tracks().is_empty());
        Ok(())
    }
}
