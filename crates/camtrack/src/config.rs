use crate::Error;
use serde::{Deserialize, Serialize};

/// Tracker configuration, shared by every camera created from one manager.
///
/// All fields have deployment-sensible defaults; `#[serde(default)]` lets a
/// deployment override only the knobs it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive matches before a tentative track is confirmed.
    pub n_init: usize,
    /// Consecutive misses before a lost track is removed.
    pub max_age: usize,
    /// Minimum IoU between predicted box and detection box for a pair to be
    /// a match candidate at all.
    pub iou_gate: f32,
    /// Combined costs above this value are disregarded even for pairs that
    /// pass the IoU gate.
    pub cost_ceiling: f32,
    /// Minimum detection confidence to spawn a new track. Detections below
    /// this can still extend existing tracks.
    pub min_confidence: f32,
    /// Weight of the newest center displacement in the exponentially
    /// weighted velocity estimate, in (0, 1].
    pub velocity_smoothing: f32,
    /// Appearance matching (primary strategy) settings.
    pub appearance: AppearanceConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            n_init: 3,
            max_age: 30,
            iou_gate: 0.1,
            cost_ceiling: 0.7,
            min_confidence: 0.6,
            velocity_smoothing: 0.5,
            appearance: AppearanceConfig::default(),
        }
    }
}

/// Settings for the appearance-aware primary strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Whether the deployment provides appearance descriptors at all. When
    /// false, every camera binds the geometry-only fallback strategy.
    pub enabled: bool,
    /// Expected descriptor vector length. Descriptors of any other length
    /// are treated as maximally distant.
    pub descriptor_len: usize,
    /// How many recent descriptors each track retains; the oldest is
    /// evicted once the ring is full.
    pub history_depth: usize,
    /// Weight of the appearance term in the combined association cost, in
    /// [0, 1]; the geometry term gets the complement.
    pub weight: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            enabled: true,
            descriptor_len: 128,
            history_depth: 30,
            weight: 0.5,
        }
    }
}

impl TrackerConfig {
    /// Check every field is within its accepted range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.n_init == 0 {
            return Err(Error::InvalidConfig("n_init must be at least 1".to_owned()));
        }
        if self.max_age == 0 {
            return Err(Error::InvalidConfig("max_age must be at least 1".to_owned()));
        }
        if !(0.0..=1.0).contains(&self.iou_gate) {
            return Err(Error::InvalidConfig(format!(
                "iou_gate must be within [0, 1], got {}",
                self.iou_gate
            )));
        }
        if self.cost_ceiling <= 0.0 || !self.cost_ceiling.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "cost_ceiling must be a positive finite value, got {}",
                self.cost_ceiling
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.velocity_smoothing <= 0.0 || self.velocity_smoothing > 1.0 {
            return Err(Error::InvalidConfig(format!(
                "velocity_smoothing must be within (0, 1], got {}",
                self.velocity_smoothing
            )));
        }
        if !(0.0..=1.0).contains(&self.appearance.weight) {
            return Err(Error::InvalidConfig(format!(
                "appearance.weight must be within [0, 1], got {}",
                self.appearance.weight
            )));
        }
        if self.appearance.history_depth == 0 {
            return Err(Error::InvalidConfig(
                "appearance.history_depth must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
