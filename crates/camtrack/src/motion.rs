use crate::BoundingBox;

/// Smallest box extent a prediction may produce.
const MIN_EXTENT: f32 = 1e-3;

/// Constant-velocity motion model.
///
/// Each track carries a center velocity estimate; the model predicts the
/// next-frame box by shifting the current box center along it. The velocity
/// is refreshed on every successful match as an exponentially weighted
/// average of observed center displacements, which tolerates detector
/// jitter without lagging real motion.
#[derive(Debug, Clone)]
pub struct MotionModel {
    /// Weight of the newest displacement, in (0, 1].
    smoothing: f32,
}

impl Default for MotionModel {
    fn default() -> Self {
        MotionModel::new(0.5)
    }
}

impl MotionModel {
    /// Returns a new MotionModel
    ///
    /// # Parameters
    ///
    /// * `smoothing`: Weight of the newest center displacement in the
    ///   velocity estimate.
    pub fn new(smoothing: f32) -> MotionModel {
        MotionModel { smoothing }
    }

    /// Predict the next-frame box for a track without mutating it.
    ///
    /// Always returns a non-degenerate box: width and height are clamped to
    /// a small positive floor.
    pub fn predicted_box(&self, bbox: &BoundingBox, velocity: (f32, f32)) -> BoundingBox {
        let (cx, cy) = bbox.center();
        let width = bbox.width().max(MIN_EXTENT);
        let height = bbox.height().max(MIN_EXTENT);
        BoundingBox::new(
            cx + velocity.0 - width / 2.0,
            cy + velocity.1 - height / 2.0,
            width,
            height,
        )
    }

    /// Fold an observed center displacement into the velocity estimate.
    pub fn blend_velocity(&self, previous: (f32, f32), displacement: (f32, f32)) -> (f32, f32) {
        (
            self.smoothing * displacement.0 + (1.0 - self.smoothing) * previous.0,
            self.smoothing * displacement.1 + (1.0 - self.smoothing) * previous.1,
        )
    }
}
