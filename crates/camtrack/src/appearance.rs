use crate::{config::AppearanceConfig, Error};
use ndarray::*;
use tracing::trace;

/// Distance reported when no usable appearance comparison exists. Also the
/// cap: anything at or beyond this value never beats a geometric match.
pub(crate) const MAX_DISTANCE: f32 = 1.0;

/// Compute the cosine distance between two non-normalized vectors.
///
/// Returns `1 - cos(a, b)`, clamped so that a zero-norm input yields the
/// maximum distance rather than NaN.
pub(crate) fn cosine_distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let denominator = a.dot(a).sqrt() * b.dot(b).sqrt();
    if denominator <= f32::EPSILON {
        return MAX_DISTANCE;
    }
    (1.0 - a.dot(b) / denominator).max(0.0)
}

/// Appearance similarity metric for the primary strategy.
///
/// For each (track, detection) pair the metric reports the minimum cosine
/// distance between the detection descriptor and any descriptor in the
/// track's stored history. The minimum, not the average: an object seen
/// from a new pose should still match its best-aligned stored sample.
#[derive(Debug, Clone)]
pub(crate) struct AppearanceMetric {
    descriptor_len: usize,
}

impl AppearanceMetric {
    /// Try to initialize the metric for one camera.
    ///
    /// Fails when the deployment does not provide appearance descriptors;
    /// the caller falls back to geometry-only association for the camera's
    /// whole session.
    pub(crate) fn try_new(config: &AppearanceConfig) -> Result<AppearanceMetric, Error> {
        if !config.enabled {
            return Err(Error::AppearanceUnavailable(
                "appearance matching disabled for this deployment".to_owned(),
            ));
        }
        if config.descriptor_len == 0 {
            return Err(Error::AppearanceUnavailable(
                "descriptor length is zero".to_owned(),
            ));
        }
        Ok(AppearanceMetric {
            descriptor_len: config.descriptor_len,
        })
    }

    /// Minimum cosine distance between `descriptor` and any entry of
    /// `history`. Returns [`MAX_DISTANCE`] when the detection has no
    /// descriptor, the descriptor has an unexpected length, or the history
    /// is empty.
    pub(crate) fn distance<'a>(
        &self,
        history: impl IntoIterator<Item = &'a Array1<f32>>,
        descriptor: Option<&Array1<f32>>,
    ) -> f32 {
        let Some(descriptor) = descriptor else {
            return MAX_DISTANCE;
        };
        if descriptor.len() != self.descriptor_len {
            trace!(
                expected = self.descriptor_len,
                got = descriptor.len(),
                "descriptor length mismatch"
            );
            return MAX_DISTANCE;
        }
        history
            .into_iter()
            .filter(|sample| sample.len() == descriptor.len())
            .map(|sample| cosine_distance(sample, descriptor))
            .fold(MAX_DISTANCE, f32::min)
    }
}
