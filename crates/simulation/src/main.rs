mod scene;

use anyhow::Result;
use camtrack::{AppearanceConfig, TrackerConfig, TrackerManager};
use clap::Parser;
use itertools::Itertools;
use rand::prelude::*;
use rand_distr::Normal;
use rand_pcg::Pcg32;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

const DESCRIPTOR_LEN: usize = 16;

/// Drive the tracking core over synthetic multi-camera scenes and write the
/// reported tracks as CSV.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of concurrent cameras
    #[arg(short, long, default_value_t = 2)]
    cameras: usize,

    /// Frames to simulate per camera
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// Objects per camera scene
    #[arg(short, long, default_value_t = 4)]
    objects: usize,

    /// Disable appearance descriptors (forces the IoU-only fallback)
    #[arg(long, default_value_t = false)]
    fallback: bool,

    /// Seed for the scene generator
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Output CSV path; stdout when omitted
    #[arg(short = 'w', long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportRow {
    camera: String,
    frame: usize,
    track_id: String,
    class_label: String,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    age: usize,
}

/// Feed one camera's frames through the shared manager in arrival order,
/// then release the camera as a stopping stream would.
fn simulate_camera(manager: &TrackerManager, camera_index: usize, args: &Args) -> Result<Vec<ReportRow>> {
    let camera = format!("camera-{camera_index}");
    let mut rng = Pcg32::seed_from_u64(args.seed.wrapping_add(camera_index as u64));
    let jitter = Normal::<f32>::new(0.0, 1.0)?;
    let objects = scene::build_objects(&mut rng, args.objects, DESCRIPTOR_LEN);
    let occlusion = (args.frames / 3)..(args.frames / 3 + 10);

    let mut rows = Vec::new();
    for frame in 0..args.frames {
        let detections = scene::frame_detections(
            &objects,
            frame,
            occlusion.clone(),
            !args.fallback,
            &mut rng,
            &jitter,
        );
        let reported = manager.process_frame(&camera, detections)?;
        for track in reported {
            let tlbr = track.bbox.to_tlbr();
            rows.push(ReportRow {
                camera: camera.clone(),
                frame,
                track_id: track.id.to_string(),
                class_label: track.class_label.unwrap_or_default(),
                x1: tlbr[0],
                y1: tlbr[1],
                x2: tlbr[2],
                y2: tlbr[3],
                age: track.age,
            });
        }
    }

    manager.release(&camera);
    Ok(rows)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    let config = TrackerConfig {
        appearance: AppearanceConfig {
            enabled: !args.fallback,
            descriptor_len: DESCRIPTOR_LEN,
            ..AppearanceConfig::default()
        },
        ..TrackerConfig::default()
    };
    let manager = TrackerManager::new(config)?;

    let rows: Vec<ReportRow> = (0..args.cameras)
        .into_par_iter()
        .map(|camera_index| simulate_camera(&manager, camera_index, &args))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    let identities = rows
        .iter()
        .map(|row| (&row.camera, &row.track_id))
        .unique()
        .count();
    info!(
        cameras = args.cameras,
        frames = args.frames,
        rows = rows.len(),
        identities,
        "simulation complete"
    );

    let out: Box<dyn std::io::Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(out);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
