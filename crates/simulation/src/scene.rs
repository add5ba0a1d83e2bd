use camtrack::{BoundingBox, Detection};
use rand::prelude::*;
use rand_distr::Normal;
use rand_pcg::Pcg32;
use std::ops::Range;

const LABELS: [&str; 4] = ["person", "car", "bicycle", "dog"];

/// One synthetic object moving on a straight lane.
pub struct SceneObject {
    pub label: &'static str,
    origin: (f32, f32),
    velocity: (f32, f32),
    size: f32,
    descriptor: Vec<f32>,
}

/// Lay out `count` objects on horizontal lanes, alternating direction so
/// neighboring objects pass each other without colliding.
pub fn build_objects(rng: &mut Pcg32, count: usize, descriptor_len: usize) -> Vec<SceneObject> {
    (0..count)
        .map(|i| {
            let rightward = i % 2 == 0;
            let descriptor = (0..descriptor_len).map(|_| rng.gen::<f32>() - 0.5).collect();
            SceneObject {
                label: LABELS[i % LABELS.len()],
                origin: (if rightward { 0.0 } else { 1200.0 }, i as f32 * 80.0),
                velocity: (if rightward { 4.0 } else { -4.0 }, 0.0),
                size: 36.0 + 8.0 * (i % 3) as f32,
                descriptor,
            }
        })
        .collect()
}

/// Detector output for one frame: every visible object with positional
/// jitter, plus occasional sub-threshold clutter that must never become a
/// track.
pub fn frame_detections(
    objects: &[SceneObject],
    frame: usize,
    occlusion: Range<usize>,
    with_descriptors: bool,
    rng: &mut Pcg32,
    jitter: &Normal<f32>,
) -> Vec<Detection> {
    let mut detections = Vec::with_capacity(objects.len() + 1);
    for (i, object) in objects.iter().enumerate() {
        // the first object disappears during the occlusion window
        if i == 0 && occlusion.contains(&frame) {
            continue;
        }
        let x = object.origin.0 + object.velocity.0 * frame as f32 + jitter.sample(rng);
        let y = object.origin.1 + object.velocity.1 * frame as f32 + jitter.sample(rng);
        let confidence = (0.9 + 0.05 * jitter.sample(rng)).clamp(0.0, 1.0);
        let descriptor = if with_descriptors {
            Some(
                object
                    .descriptor
                    .iter()
                    .map(|v| v + 0.01 * jitter.sample(rng))
                    .collect(),
            )
        } else {
            None
        };
        detections.push(Detection::new(
            None,
            BoundingBox::new(x, y, object.size, object.size),
            confidence,
            Some(object.label.to_owned()),
            descriptor,
        ));
    }

    if frame % 7 == 0 {
        let x = rng.gen::<f32>() * 1200.0;
        let y = rng.gen::<f32>() * 400.0;
        detections.push(Detection::new(
            None,
            BoundingBox::new(x, y, 20.0, 20.0),
            0.2,
            None,
            None,
        ));
    }
    detections
}
