use crate::BoundingBox;
use ndarray::*;

/// Intersection over union cost matrix.
///
/// # Parameters
///
/// * `track_boxes`: Predicted track boxes, one row each.
/// * `detection_boxes`: Detection boxes, one column each.
///
/// # Returns
///
/// A cost matrix of shape `(track_boxes.len(), detection_boxes.len())`
/// where entry (i, j) is `1 - iou(track_boxes[i], detection_boxes[j])`.
pub(crate) fn iou_cost_matrix(
    track_boxes: &[BoundingBox],
    detection_boxes: &[BoundingBox],
) -> Array2<f32> {
    let mut costs = Array2::<f32>::zeros((track_boxes.len(), detection_boxes.len()));
    for (i, track_box) in track_boxes.iter().enumerate() {
        for (j, detection_box) in detection_boxes.iter().enumerate() {
            costs[[i, j]] = 1.0 - track_box.iou(detection_box);
        }
    }
    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use ndarray::*;

    #[test]
    fn iou_cost() {
        let tracks = vec![
            BoundingBox::new(0.0, 0.0, 5.0, 5.0),
            BoundingBox::new(5.0, 5.0, 5.0, 5.0),
        ];
        let detections = vec![
            BoundingBox::new(0.0, 0.0, 5.0, 5.0),
            BoundingBox::new(1.0, 1.0, 5.0, 5.0),
            BoundingBox::new(2.0, 2.0, 5.0, 5.0),
            BoundingBox::new(3.0, 3.0, 5.0, 5.0),
            BoundingBox::new(4.0, 4.0, 5.0, 5.0),
            BoundingBox::new(5.0, 5.0, 5.0, 5.0),
        ];

        let costs = iou_cost_matrix(&tracks, &detections);

        assert_eq!(
            costs,
            arr2::<f32, _>(&[
                [0.0, 0.5294118, 0.7804878, 0.9130435, 0.97959185, 1.0],
                [1.0, 0.97959185, 0.9130435, 0.7804878, 0.5294118, 0.0]
            ])
        );
    }

    #[test]
    fn empty_inputs_yield_empty_matrix() {
        let costs = iou_cost_matrix(&[], &[BoundingBox::new(0.0, 0.0, 5.0, 5.0)]);
        assert_eq!(costs.dim(), (0, 1));
    }
}
