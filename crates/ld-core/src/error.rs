use core::fmt;

/// Buffer/shape errors raised while constructing grids and views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    InvalidStride,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidStride => write!(f, "invalid stride"),
        }
    }
}

impl std::error::Error for Error {}

/// Reasons a raw input image cannot enter the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// Shape is not `[height, width]`.
    Rank { rank: usize },
    ZeroDimension { width: usize, height: usize },
    SampleCount { expected: usize, actual: usize },
    NonFinite { x: usize, y: usize, value: f32 },
    /// Float sample outside `[0, 1]`.
    OutOfRange { x: usize, y: usize, value: f32 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rank { rank } => {
                write!(f, "expected a 2-D image, got rank {rank}")
            }
            Self::ZeroDimension { width, height } => {
                write!(f, "image has a zero dimension ({width}x{height})")
            }
            Self::SampleCount { expected, actual } => {
                write!(f, "sample count mismatch: expected {expected}, got {actual}")
            }
            Self::NonFinite { x, y, value } => {
                write!(f, "non-finite sample {value} at ({x}, {y})")
            }
            Self::OutOfRange { x, y, value } => {
                write!(f, "sample {value} at ({x}, {y}) is outside [0, 1]")
            }
        }
    }
}

impl std::error::Error for InputError {}
