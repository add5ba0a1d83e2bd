//! Per-camera multi-object tracking for video analytics pipelines.
//!
//! Assigns each detection a temporally stable identity across frames,
//! through brief occlusion, detector noise and missed detections. One
//! tracker per camera; the appearance-aware primary strategy degrades to
//! geometry-only association when descriptors are unavailable.
//!
//! # Examples
//!
//! ```
//! use camtrack::{BoundingBox, Detection, TrackerConfig, TrackerManager};
//!
//! # fn main() -> Result<(), camtrack::Error> {
//! let manager = TrackerManager::new(TrackerConfig::default())?;
//!
//! // per frame: detector output in, confirmed tracks out
//! let detection = Detection::new(
//!     None,
//!     BoundingBox::from_corners(10.0, 10.0, 60.0, 120.0),
//!     0.9,
//!     Some("person".to_owned()),
//!     Some(vec![0.0; 128]),
//! );
//! let reported = manager.process_frame("front_door", vec![detection])?;
//! for track in &reported {
//!     println!("{} {:?} {:?}", track.id, track.class_label, track.bbox);
//! }
//!
//! // when the camera's stream stops
//! manager.release("front_door");
//! # Ok(())
//! # }
//! ```

mod appearance;
mod bounding_box;
mod config;
mod detection;
mod error;
mod iou_matching;
mod linear_assignment;
mod manager;
mod motion;
mod track;
mod tracker;

pub use bounding_box::BoundingBox;
pub use config::AppearanceConfig;
pub use config::TrackerConfig;
pub use detection::Detection;
pub use error::Error;
pub use manager::TrackerManager;
pub use motion::MotionModel;
pub use track::StrategyKind;
pub use track::Track;
pub use track::TrackId;
pub use track::TrackOutput;
pub use track::TrackState;
pub use tracker::CameraTracker;
