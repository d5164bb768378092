use crate::{Image, InputError};

/// Sample storage for a raw input, tagged with its numeric domain.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Integer intensities in `[0, 255]`.
    Byte(Vec<u8>),
    /// Float intensities, expected in `[0, 1]`.
    Unit(Vec<f32>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(v) => v.len(),
            Self::Unit(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unvalidated image as handed over by an image source.
///
/// `shape` is `[height, width]` for a well-formed input. Any other rank, a
/// zero extent, a mismatched sample count, a NaN/inf sample or a float sample
/// outside `[0, 1]` is rejected by [`RawImage::to_unit_image`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub shape: Vec<usize>,
    pub samples: Samples,
}

impl RawImage {
    pub fn new(shape: Vec<usize>, samples: Samples) -> Self {
        Self { shape, samples }
    }

    pub fn from_u8(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self::new(vec![height, width], Samples::Byte(data))
    }

    pub fn from_f32(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self::new(vec![height, width], Samples::Unit(data))
    }

    /// `(width, height)` if the shape is 2-D.
    pub fn dims(&self) -> Option<(usize, usize)> {
        match self.shape.as_slice() {
            &[height, width] => Some((width, height)),
            _ => None,
        }
    }

    /// Validates the input and normalizes it to `f32` in `[0, 1]`.
    ///
    /// Bytes are divided by 255. Float samples must be finite and inside
    /// `[0, 1]`; they are not clamped.
    pub fn to_unit_image(&self) -> Result<Image<f32>, InputError> {
        let (width, height) = self.dims().ok_or(InputError::Rank {
            rank: self.shape.len(),
        })?;
        if width == 0 || height == 0 {
            return Err(InputError::ZeroDimension { width, height });
        }

        let expected = width
            .checked_mul(height)
            .ok_or(InputError::SampleCount {
                expected: usize::MAX,
                actual: self.samples.len(),
            })?;
        if self.samples.len() != expected {
            return Err(InputError::SampleCount {
                expected,
                actual: self.samples.len(),
            });
        }

        let data = match &self.samples {
            Samples::Byte(v) => v.iter().map(|&px| f32::from(px) / 255.0).collect(),
            Samples::Unit(v) => {
                if let Some(idx) = v.iter().position(|s| !s.is_finite()) {
                    return Err(InputError::NonFinite {
                        x: idx % width,
                        y: idx / width,
                        value: v[idx],
                    });
                }
                if let Some(idx) = v.iter().position(|s| !(0.0..=1.0).contains(s)) {
                    return Err(InputError::OutOfRange {
                        x: idx % width,
                        y: idx / width,
                        value: v[idx],
                    });
                }
                v.clone()
            }
        };

        Image::from_vec(width, height, data).map_err(|_| InputError::SampleCount {
            expected,
            actual: self.samples.len(),
        })
    }
}
