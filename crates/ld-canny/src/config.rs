use core::fmt;

use ld_core::BorderPolicy;
use serde::{Deserialize, Serialize};

/// Parameters of the five-stage edge pipeline.
///
/// Checked once by [`PipelineConfig::validate`] when a
/// [`CannyPipeline`](crate::CannyPipeline) is built and never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Gaussian standard deviation, in pixels.
    pub sigma: f32,
    /// Side of the square smoothing kernel; odd and at least 3.
    pub kernel_size: usize,
    /// Weak cutoff as a fraction of the per-image maximum thinned magnitude.
    pub low_ratio: f32,
    /// Strong cutoff as a fraction of the per-image maximum thinned magnitude.
    pub high_ratio: f32,
    pub weak_pixel_value: u8,
    pub strong_pixel_value: u8,
    /// Smoothing border policy.
    pub border: BorderPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sigma: 1.4,
            kernel_size: 5,
            low_ratio: 0.09,
            high_ratio: 0.20,
            weak_pixel_value: 100,
            strong_pixel_value: 255,
            border: BorderPolicy::Replicate,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_sigma(self.sigma)?;
        check_kernel_size(self.kernel_size)?;

        let (low, high) = (self.low_ratio, self.high_ratio);
        let ordered = low > 0.0 && low < high && high < 1.0;
        if !ordered {
            return Err(ConfigError::RatioOrder { low, high });
        }

        if self.weak_pixel_value == 0 || self.strong_pixel_value == 0 {
            return Err(ConfigError::ZeroMarker);
        }
        if self.weak_pixel_value == self.strong_pixel_value {
            return Err(ConfigError::MarkersEqual {
                value: self.weak_pixel_value,
            });
        }

        Ok(())
    }
}

pub(crate) fn check_sigma(sigma: f32) -> Result<(), ConfigError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Sigma { sigma })
    }
}

/// Largest accepted kernel side.
pub const MAX_KERNEL_SIZE: usize = 255;

pub(crate) fn check_kernel_size(size: usize) -> Result<(), ConfigError> {
    if size % 2 == 0 {
        return Err(ConfigError::EvenKernelSize { size });
    }
    if size < 3 {
        return Err(ConfigError::KernelTooSmall { size });
    }
    if size > MAX_KERNEL_SIZE {
        return Err(ConfigError::KernelTooLarge { size });
    }
    Ok(())
}

/// Rejected pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sigma must be finite and strictly positive.
    Sigma { sigma: f32 },
    EvenKernelSize { size: usize },
    KernelTooSmall { size: usize },
    /// Above [`MAX_KERNEL_SIZE`].
    KernelTooLarge { size: usize },
    /// Requires `0 < low < high < 1`.
    RatioOrder { low: f32, high: f32 },
    ZeroMarker,
    MarkersEqual { value: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sigma { sigma } => write!(f, "sigma must be > 0 and finite, got {sigma}"),
            Self::EvenKernelSize { size } => {
                write!(f, "kernel size must be odd, got {size}")
            }
            Self::KernelTooSmall { size } => {
                write!(f, "kernel size must be at least 3, got {size}")
            }
            Self::KernelTooLarge { size } => {
                write!(f, "kernel size must be at most {MAX_KERNEL_SIZE}, got {size}")
            }
            Self::RatioOrder { low, high } => write!(
                f,
                "threshold ratios must satisfy 0 < low < high < 1, got low={low} high={high}"
            ),
            Self::ZeroMarker => write!(f, "weak and strong pixel values must be nonzero"),
            Self::MarkersEqual { value } => {
                write!(f, "weak and strong pixel values must differ, both are {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
