use crate::BoundingBox;
use ndarray::*;
use uuid::Uuid;

/// Detection represents one bounding box produced by the upstream detector
/// for a single frame.
///
/// Detections are ephemeral: the tracker consumes them during one matching
/// round and keeps only what it copies onto the matched track.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Unique detection identifier
    id: Uuid,
    /// Bounding box in top, left, width, height format.
    bbox: BoundingBox,
    /// Detection confidence score.
    confidence: f32,
    /// Optional class label.
    class_label: Option<String>,
    /// Optional appearance descriptor from a re-identification model.
    descriptor: Option<Array1<f32>>,
}

impl Detection {
    /// Returns a new Detection
    ///
    /// # Parameters
    ///
    /// * `id`: An optional identifier; generated when the pipeline does not
    ///   supply one.
    /// * `bbox`: A bounding box object.
    /// * `confidence`: Detection confidence score.
    /// * `class_label`: An optional class label.
    /// * `descriptor`: An optional appearance vector describing the object
    ///   contained in this box.
    pub fn new(
        id: Option<Uuid>,
        bbox: BoundingBox,
        confidence: f32,
        class_label: Option<String>,
        descriptor: Option<Vec<f32>>,
    ) -> Detection {
        Detection {
            id: id.unwrap_or_else(Uuid::new_v4),
            bbox,
            confidence,
            class_label,
            descriptor: descriptor.map(Array1::from_vec),
        }
    }

    /// Returns the unique id of the detection
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Returns a BoundingBox of the detection co-ordinates
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns the confidence of the detection
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Returns the class label of the detection
    pub fn class_label(&self) -> Option<&str> {
        self.class_label.as_deref()
    }

    /// Returns the appearance descriptor of the detection
    pub fn descriptor(&self) -> Option<&Array1<f32>> {
        self.descriptor.as_ref()
    }
}
