//! Example: per-lane density on a horizontally-merged intersection image.
//!
//! Loads a PNG made of N equal-width lane photos placed side by side, splits
//! it into one grayscale image per lane, runs the edge pipeline over the
//! batch and looks up a green-light time for every lane.
//!
//! Results are written to a JSON file next to the input image.
//! Per-lane and total timing is printed to stdout.
//!
//! Run from the workspace root:
//!   cargo run -p lane-density --example detect_batch -- --help
//!   cargo run -p lane-density --example detect_batch -- --input data/lanes.png

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::ImageReader;
use lane_density::{
    CannyPipeline, GrayWeights, PipelineConfig, RawImage, TimeAllocation, TrafficLevel, assess,
    luma_from_rgb8, strong_pixels,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Estimate per-lane traffic density in a horizontally-merged image")]
struct Args {
    #[arg(long, default_value = "data/lanes.png")]
    input: String,

    /// Number of equal-width lanes merged in the image
    #[arg(long, default_value_t = 4)]
    lanes: usize,

    #[arg(long, default_value_t = 1.4)]
    sigma: f32,

    /// Per-lane reference counts, comma separated
    #[arg(long, value_delimiter = ',', default_value = "500,1000,1500,2000")]
    thresholds: Vec<usize>,

    /// Run lanes on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Output JSON path (default: <input stem>_density.json next to input)
    #[arg(long)]
    out: Option<String>,
}

#[derive(Serialize)]
struct LaneResult {
    lane: usize,
    width: usize,
    height: usize,
    strong_pixels: usize,
    level: TrafficLevel,
    green_time_seconds: u32,
}

#[derive(Serialize)]
struct Report {
    elapsed_ms: f64,
    lanes: Vec<LaneResult>,
}

/// Copies lane `idx` (a column band) out of the packed RGB buffer.
fn extract_lane(rgb: &[u8], full_width: usize, height: usize, lane_w: usize, idx: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(lane_w * height * 3);
    let offset = idx * lane_w * 3;
    for row in rgb.chunks_exact(full_width * 3).take(height) {
        buf.extend_from_slice(&row[offset..offset + lane_w * 3]);
    }
    buf
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let out_path = args.out.clone().unwrap_or_else(|| {
        let p = Path::new(&args.input);
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let dir = p.parent().unwrap_or(Path::new("."));
        dir.join(format!("{stem}_density.json"))
            .to_string_lossy()
            .into_owned()
    });

    let rgb = ImageReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input))?
        .decode()
        .with_context(|| format!("decoding {}", args.input))?
        .into_rgb8();

    let full_width = rgb.width() as usize;
    let height = rgb.height() as usize;
    if args.lanes == 0 || full_width % args.lanes != 0 {
        bail!(
            "image width {full_width} is not divisible by lanes={}",
            args.lanes
        );
    }
    let lane_w = full_width / args.lanes;
    println!(
        "loaded {}: {full_width}x{height}, {} lanes of {lane_w}x{height}",
        args.input, args.lanes
    );

    let images = (0..args.lanes)
        .map(|i| {
            let lane = extract_lane(rgb.as_raw(), full_width, height, lane_w, i);
            luma_from_rgb8(lane_w, height, &lane, GrayWeights::default())
        })
        .collect::<Result<Vec<RawImage>, _>>()
        .context("converting lanes to grayscale")?;

    let cfg = PipelineConfig {
        sigma: args.sigma,
        ..PipelineConfig::default()
    };
    let pipe = CannyPipeline::new(cfg, images).context("building pipeline")?;

    let start = Instant::now();
    let maps = if args.parallel {
        pipe.process_parallel()?
    } else {
        pipe.process()?
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

    let table = TimeAllocation::default();
    let lanes: Vec<LaneResult> = maps
        .iter()
        .enumerate()
        .map(|(lane, map)| {
            let count = strong_pixels(map);
            let a = assess(count, &args.thresholds, &table);
            println!(
                "  lane {lane}: {count} edge pixels, {} ({} s)",
                a.label, a.green_time_seconds
            );
            LaneResult {
                lane,
                width: lane_w,
                height,
                strong_pixels: count,
                level: a.level,
                green_time_seconds: a.green_time_seconds,
            }
        })
        .collect();
    println!("total detection time: {elapsed_ms:.2} ms");

    let out_file =
        std::fs::File::create(&out_path).with_context(|| format!("creating {out_path}"))?;
    serde_json::to_writer_pretty(out_file, &Report { elapsed_ms, lanes })
        .with_context(|| format!("writing JSON to {out_path}"))?;

    println!("results written to {out_path}");
    Ok(())
}
