use core::fmt;
use std::time::Instant;

use ld_core::{Image, InputError, RawImage};
use rayon::prelude::*;

use crate::{
    ClassificationGrid, ConfigError, EdgeClass, EdgeMap, GaussianKernel, GradientField, PipelineConfig,
    Propagation, classify, link_edges, smooth, sobel_gradients, suppress,
};

/// Malformed image at position `index` of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProcessingError {
    pub index: usize,
    pub source: InputError,
}

impl fmt::Display for ImageProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image {} rejected: {}", self.index, self.source)
    }
}

impl std::error::Error for ImageProcessingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Every intermediate grid of one run, for inspection and tooling.
#[derive(Debug, Clone)]
pub struct StageOutputs {
    pub smoothed: Image<f32>,
    pub gradient: GradientField,
    pub thinned: Image<f32>,
    pub classified: ClassificationGrid,
    pub edges: EdgeMap,
}

/// Validated configuration plus an ordered batch of inputs.
///
/// The configuration and the kernel derived from it are frozen at
/// construction. Each image runs through smoothing, gradients, suppression,
/// thresholding and linking on scratch grids it owns exclusively, so images
/// never observe each other.
#[derive(Debug, Clone)]
pub struct CannyPipeline {
    config: PipelineConfig,
    kernel: GaussianKernel,
    propagation: Propagation,
    images: Vec<RawImage>,
}

impl CannyPipeline {
    pub fn new(config: PipelineConfig, images: Vec<RawImage>) -> Result<Self, ConfigError> {
        config.validate()?;
        let kernel = GaussianKernel::new(config.sigma, config.kernel_size)?;

        Ok(Self {
            config,
            kernel,
            propagation: Propagation::default(),
            images,
        })
    }

    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    pub fn images(&self) -> &[RawImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Runs the batch in order and returns one edge map per input.
    ///
    /// Fails on the first malformed image; no partial result is returned.
    pub fn process(&self) -> Result<Vec<EdgeMap>, ImageProcessingError> {
        log::info!("processing {} image(s)", self.images.len());

        let mut out = Vec::with_capacity(self.images.len());
        for (index, raw) in self.images.iter().enumerate() {
            let edges = self
                .detect(raw)
                .map_err(|source| ImageProcessingError { index, source })?;
            out.push(edges);
        }
        Ok(out)
    }

    /// Same contract as [`CannyPipeline::process`], spread over the rayon
    /// pool.
    ///
    /// Inputs are validated in order before any work is dispatched, so the
    /// reported error is always the lowest failing index.
    pub fn process_parallel(&self) -> Result<Vec<EdgeMap>, ImageProcessingError> {
        log::info!(
            "processing {} image(s) on {} worker(s)",
            self.images.len(),
            rayon::current_num_threads()
        );

        let normalized = self
            .images
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                raw.to_unit_image()
                    .map_err(|source| ImageProcessingError { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(normalized.par_iter().map(|img| self.run(img)).collect())
    }

    /// Runs a single image with this pipeline's configuration.
    pub fn detect(&self, raw: &RawImage) -> Result<EdgeMap, InputError> {
        let img = raw.to_unit_image()?;
        Ok(self.run(&img))
    }

    pub fn detect_stages(&self, raw: &RawImage) -> Result<StageOutputs, InputError> {
        let img = raw.to_unit_image()?;
        let (smoothed, gradient, thinned, classified) = self.classify_stages(&img);
        let edges = self.link(classified.clone());

        Ok(StageOutputs {
            smoothed,
            gradient,
            thinned,
            classified,
            edges,
        })
    }

    fn run(&self, img: &Image<f32>) -> EdgeMap {
        let (_, _, _, classified) = self.classify_stages(img);
        self.link(classified)
    }

    fn link(&self, classified: ClassificationGrid) -> EdgeMap {
        let linked = link_edges(classified, self.propagation);
        EdgeMap::from_linked(&linked, self.config.strong_pixel_value)
    }

    fn classify_stages(
        &self,
        img: &Image<f32>,
    ) -> (Image<f32>, GradientField, Image<f32>, ClassificationGrid) {
        let start = Instant::now();
        let cfg = &self.config;

        let smoothed = smooth(img, &self.kernel, cfg.border);
        let gradient = sobel_gradients(&smoothed);
        let thinned = suppress(&gradient);
        log::trace!(
            "smoothed, gradients and suppression done after {:.2} ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        let classified = classify(&thinned, cfg.low_ratio, cfg.high_ratio);

        let (w, h) = img.dims();
        match classified.thresholds() {
            Some(t) => log::debug!(
                "{w}x{h}: max={:.4} low={:.4} high={:.4} strong seeds={} ({:.2} ms)",
                t.max_magnitude,
                t.low,
                t.high,
                classified.count(EdgeClass::Strong),
                start.elapsed().as_secs_f64() * 1000.0
            ),
            None => log::debug!("{w}x{h}: no gradient, empty edge map"),
        }

        (smoothed, gradient, thinned, classified)
    }
}
