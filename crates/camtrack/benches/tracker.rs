use camtrack::{AppearanceConfig, BoundingBox, CameraTracker, Detection, TrackerConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use rand_distr::Normal;
use rand_pcg::Pcg32;

const DESCRIPTOR_LEN: usize = 128;

fn frame(rng: &mut Pcg32, jitter: &Normal<f32>, objects: usize) -> Vec<Detection> {
    (0..objects)
        .map(|i| {
            let x = (i % 8) as f32 * 60.0 + jitter.sample(rng);
            let y = (i / 8) as f32 * 60.0 + jitter.sample(rng);
            let descriptor: Vec<f32> = (0..DESCRIPTOR_LEN)
                .map(|d| if d == i % DESCRIPTOR_LEN { 1.0 } else { 0.0 })
                .collect();
            Detection::new(
                None,
                BoundingBox::new(x, y, 40.0, 40.0),
                0.9,
                Some("person".to_owned()),
                Some(descriptor),
            )
        })
        .collect()
}

fn bench_round(c: &mut Criterion) {
    for objects in [4usize, 20] {
        c.bench_function(&format!("round_{objects}_tracks"), |b| {
            let mut rng = Pcg32::seed_from_u64(0);
            let jitter = Normal::<f32>::new(0.0, 0.5).unwrap();
            let config = TrackerConfig {
                appearance: AppearanceConfig {
                    descriptor_len: DESCRIPTOR_LEN,
                    ..AppearanceConfig::default()
                },
                ..TrackerConfig::default()
            };
            let mut tracker = CameraTracker::new("bench", config);
            // reach steady state so every round matches existing tracks
            for _ in 0..5 {
                tracker.process(frame(&mut rng, &jitter, objects)).unwrap();
            }
            b.iter(|| {
                tracker
                    .process(frame(&mut rng, &jitter, objects))
                    .unwrap()
            });
        });
    }
}

criterion_group!(benches, bench_round);
criterion_main!(benches);
