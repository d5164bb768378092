//! Five-stage edge pipeline over single-channel still images.
//!
//! Stages, in order:
//! 1. [`smooth`] with a normalized [`GaussianKernel`].
//! 2. [`sobel_gradients`]: magnitude plus a 4-bucket unsigned [`Direction`].
//! 3. [`suppress`]: non-maximum suppression along that direction.
//! 4. [`classify`]: weak/strong cutoffs as fractions of the image's own
//!    maximum thinned magnitude.
//! 5. [`link_edges`]: hysteresis over 8-connected neighbors.
//!
//! [`CannyPipeline`] sequences the stages over an ordered batch and returns
//! one [`EdgeMap`] per input, holding only `0` and the strong marker.
//!
//! Border handling: smoothing resolves out-of-range taps with the configured
//! [`BorderPolicy`](ld_core::BorderPolicy) (replicate by default); gradients
//! and suppression zero the outermost 1-pixel frame.
//!
//! A flat (edge-free) image has a zero maximum magnitude and yields an empty
//! edge map without computing any cutoff.

pub mod config;
pub mod gradient;
pub mod hysteresis;
pub mod kernel;
pub mod nms;
pub mod pipeline;
pub mod smooth;
pub mod threshold;

pub use config::{ConfigError, PipelineConfig};
pub use gradient::{Direction, GradientField, sobel_gradients};
pub use hysteresis::{EdgeMap, Propagation, link_edges};
pub use kernel::GaussianKernel;
pub use nms::suppress;
pub use pipeline::{CannyPipeline, ImageProcessingError, StageOutputs};
pub use smooth::smooth;
pub use threshold::{ClassificationGrid, EdgeClass, Thresholds, classify};
