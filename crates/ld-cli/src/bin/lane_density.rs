use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::GrayImage;
use ld_canny::{
    CannyPipeline, Direction, EdgeMap, ImageProcessingError, PipelineConfig, Propagation,
    StageOutputs,
};
use ld_core::{BorderPolicy, GrayWeights, Image, RawImage, luma_from_rgb8};
use ld_density::{Assessment, TimeAllocation, assess, count_value, density_ratio, strong_pixels};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "lane_density")]
#[command(about = "Edge-based traffic density estimation for lane photos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run edge detection over a batch of images and write edge maps.
    Detect(DetectArgs),
    /// Count strong pixels in an edge map and look up the green-light time.
    Density(DensityArgs),
}

#[derive(Args, Debug, Clone)]
struct DetectArgs {
    /// Input images, processed in the order given.
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    sigma: Option<f32>,
    #[arg(long)]
    kernel_size: Option<usize>,
    #[arg(long)]
    low_ratio: Option<f32>,
    #[arg(long)]
    high_ratio: Option<f32>,
    #[arg(long, value_enum)]
    border: Option<BorderArg>,
    /// Spread the batch over the rayon thread pool.
    #[arg(long)]
    parallel: bool,
    /// Propagate hysteresis breadth-first instead of depth-first.
    #[arg(long)]
    breadth_first: bool,
    /// Also write every intermediate stage as PNG.
    #[arg(long)]
    dump_stages: bool,
}

#[derive(Args, Debug, Clone)]
struct DensityArgs {
    /// Edge map of the lane being assessed.
    #[arg(long)]
    sample: PathBuf,
    /// Edge map of the empty lane, reported as a ratio only.
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Per-lane reference counts, comma separated.
    #[arg(long, required = true, value_delimiter = ',', num_args = 1..)]
    thresholds: Vec<usize>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BorderArg {
    Zero,
    Replicate,
    Reflect101,
}

impl From<BorderArg> for BorderPolicy {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::Zero => BorderPolicy::Zero,
            BorderArg::Replicate => BorderPolicy::Replicate,
            BorderArg::Reflect101 => BorderPolicy::Reflect101,
        }
    }
}

/// On-disk configuration; every section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    canny: PipelineConfig,
    grayscale: GrayWeights,
    traffic: TimeAllocation,
}

impl AppConfig {
    fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                ensure_file_exists(p, "config")?;
                read_json(p)
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageSummary {
    index: usize,
    input: String,
    width: usize,
    height: usize,
    strong_pixels: usize,
    output: String,
}

#[derive(Debug, Serialize)]
struct DetectSummary {
    config: PipelineConfig,
    parallel: bool,
    elapsed_ms: f64,
    images: Vec<ImageSummary>,
}

#[derive(Debug, Serialize)]
struct DensityReport {
    #[serde(flatten)]
    assessment: Assessment,
    reference_pixels: Option<usize>,
    density_ratio: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Detect(args) => run_detect(args),
        Command::Density(args) => run_density(args),
    }
}

fn run_detect(args: DetectArgs) -> Result<()> {
    let app = AppConfig::load(args.config.as_deref())?;
    let cfg = apply_overrides(app.canny, &args);

    let mut images = Vec::with_capacity(args.input.len());
    for path in &args.input {
        ensure_file_exists(path, "input")?;
        images.push(load_gray(path, app.grayscale)?);
    }

    let propagation = if args.breadth_first {
        Propagation::BreadthFirst
    } else {
        Propagation::DepthFirst
    };
    let pipe = CannyPipeline::new(cfg, images)
        .context("invalid pipeline configuration")?
        .with_propagation(propagation);

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let start = Instant::now();
    let maps = if args.dump_stages {
        run_with_stages(&pipe, &args.out)?
    } else if args.parallel {
        pipe.process_parallel()?
    } else {
        pipe.process()?
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut summaries = Vec::with_capacity(maps.len());
    for (index, (map, input)) in maps.iter().zip(&args.input).enumerate() {
        let path = args.out.join(format!("edges_{index}.png"));
        save_u8_image(&path, map.image())?;

        let (width, height) = map.dims();
        let count = strong_pixels(map);
        log::info!(
            "{}: {width}x{height}, {count} strong pixels -> {}",
            input.display(),
            path.display()
        );
        summaries.push(ImageSummary {
            index,
            input: input.display().to_string(),
            width,
            height,
            strong_pixels: count,
            output: path.display().to_string(),
        });
    }

    log::info!("{} image(s) in {elapsed_ms:.2} ms", maps.len());
    write_json(
        &args.out.join("summary.json"),
        &DetectSummary {
            config: pipe.config().clone(),
            parallel: args.parallel && !args.dump_stages,
            elapsed_ms,
            images: summaries,
        },
    )
}

fn run_density(args: DensityArgs) -> Result<()> {
    let app = AppConfig::load(args.config.as_deref())?;
    let strong = app.canny.strong_pixel_value;

    if args.thresholds.is_empty() {
        bail!("at least one threshold is required");
    }

    let sample = count_strong(&args.sample, strong)?;
    let reference = args
        .reference
        .as_deref()
        .map(|p| count_strong(p, strong))
        .transpose()?;

    let assessment = assess(sample, &args.thresholds, &app.traffic);
    let report = DensityReport {
        reference_pixels: reference,
        density_ratio: reference.and_then(|r| density_ratio(sample, r)),
        assessment,
    };

    let text = serde_json::to_string_pretty(&report).context("serializing report")?;
    println!("{text}");
    Ok(())
}

fn run_with_stages(pipe: &CannyPipeline, out: &Path) -> Result<Vec<EdgeMap>> {
    let weak = pipe.config().weak_pixel_value;
    let strong = pipe.config().strong_pixel_value;

    let mut maps = Vec::with_capacity(pipe.len());
    for (index, raw) in pipe.images().iter().enumerate() {
        let stages = pipe
            .detect_stages(raw)
            .map_err(|source| ImageProcessingError { index, source })?;
        save_stages(&stages, out, index, weak, strong)?;
        maps.push(stages.edges);
    }
    Ok(maps)
}

fn save_stages(stages: &StageOutputs, out: &Path, index: usize, weak: u8, strong: u8) -> Result<()> {
    let dir = out.join(format!("stages_{index}"));
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating stage directory {}", dir.display()))?;

    let smoothed = stages
        .smoothed
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8);
    save_u8_image(&dir.join("smoothed.png"), &smoothed)?;
    save_u8_image(
        &dir.join("magnitude.png"),
        &f32_to_u8_vis(stages.gradient.magnitude()),
    )?;
    save_u8_image(
        &dir.join("direction.png"),
        &stages.gradient.direction().map(|d| direction_shade(*d)),
    )?;
    save_u8_image(&dir.join("thinned.png"), &f32_to_u8_vis(&stages.thinned))?;
    save_u8_image(
        &dir.join("classified.png"),
        &stages.classified.to_markers(weak, strong),
    )?;
    Ok(())
}

fn apply_overrides(mut cfg: PipelineConfig, args: &DetectArgs) -> PipelineConfig {
    if let Some(v) = args.sigma {
        cfg.sigma = v;
    }
    if let Some(v) = args.kernel_size {
        cfg.kernel_size = v;
    }
    if let Some(v) = args.low_ratio {
        cfg.low_ratio = v;
    }
    if let Some(v) = args.high_ratio {
        cfg.high_ratio = v;
    }
    if let Some(v) = args.border {
        cfg.border = v.into();
    }
    cfg
}

fn load_gray(path: &Path, weights: GrayWeights) -> Result<RawImage> {
    let rgb = image::open(path)
        .with_context(|| format!("opening input image {}", path.display()))?
        .to_rgb8();
    let (w, h) = rgb.dimensions();

    luma_from_rgb8(w as usize, h as usize, rgb.as_raw(), weights)
        .with_context(|| format!("converting {} to grayscale", path.display()))
}

fn count_strong(path: &Path, strong: u8) -> Result<usize> {
    ensure_file_exists(path, "edge map")?;
    let luma = image::open(path)
        .with_context(|| format!("opening edge map {}", path.display()))?
        .to_luma8();
    let (w, h) = luma.dimensions();
    let img = Image::from_vec(w as usize, h as usize, luma.into_raw())
        .with_context(|| format!("constructing image from {}", path.display()))?;

    Ok(count_value(&img.as_view(), strong))
}

fn save_u8_image(path: &Path, img: &Image<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}

/// Min-max stretch to the full byte range; flat grids render black.
fn f32_to_u8_vis(img: &Image<f32>) -> Image<u8> {
    let (min_v, max_v) = img
        .data()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !(max_v - min_v).is_normal() {
        return img.map(|_| 0);
    }

    let scale = 255.0 / (max_v - min_v);
    img.map(|&v| ((v - min_v) * scale).round().clamp(0.0, 255.0) as u8)
}

fn direction_shade(d: Option<Direction>) -> u8 {
    match d {
        None => 0,
        Some(Direction::Deg0) => 64,
        Some(Direction::Deg45) => 128,
        Some(Direction::Deg90) => 192,
        Some(Direction::Deg135) => 255,
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ld_core::BorderPolicy;

    use super::{AppConfig, Cli, Command, apply_overrides, f32_to_u8_vis};
    use ld_core::Image;

    #[test]
    fn flags_override_file_values() {
        let cli = Cli::parse_from([
            "lane_density",
            "detect",
            "--input",
            "a.png",
            "b.png",
            "--sigma",
            "2.0",
            "--border",
            "reflect101",
        ]);
        let Command::Detect(args) = cli.cmd else {
            panic!("expected detect");
        };
        assert_eq!(args.input.len(), 2);

        let base: AppConfig =
            serde_json::from_str(r#"{ "canny": { "sigma": 1.0, "kernel_size": 7 } }"#)
                .expect("valid json");
        let cfg = apply_overrides(base.canny, &args);
        assert_eq!(cfg.sigma, 2.0);
        assert_eq!(cfg.kernel_size, 7);
        assert_eq!(cfg.border, BorderPolicy::Reflect101);
    }

    #[test]
    fn thresholds_split_on_commas() {
        let cli = Cli::parse_from([
            "lane_density",
            "density",
            "--sample",
            "edges_0.png",
            "--thresholds",
            "10,20,30,40",
        ]);
        let Command::Density(args) = cli.cmd else {
            panic!("expected density");
        };
        assert_eq!(args.thresholds, [10, 20, 30, 40]);
        assert!(args.reference.is_none());
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").expect("valid json");
        assert_eq!(cfg.canny, ld_canny::PipelineConfig::default());
        assert_eq!(cfg.traffic, ld_density::TimeAllocation::default());
    }

    #[test]
    fn visualization_stretches_range() {
        let img = Image::from_vec(3, 1, vec![1.0f32, 2.0, 3.0]).expect("valid");
        assert_eq!(f32_to_u8_vis(&img).data(), &[0, 128, 255]);

        let flat = Image::new_fill(2, 2, 0.5f32);
        assert!(f32_to_u8_vis(&flat).data().iter().all(|&v| v == 0));
    }
}
