use serde::{Deserialize, Serialize};

use crate::{Error, RawImage};

/// Luma weights applied to interleaved RGB samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrayWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for GrayWeights {
    fn default() -> Self {
        Self {
            r: 0.2989,
            g: 0.5870,
            b: 0.1140,
        }
    }
}

/// Converts packed RGB8 to a single-channel input in the unit domain.
pub fn luma_from_rgb8(
    width: usize,
    height: usize,
    rgb: &[u8],
    weights: GrayWeights,
) -> Result<RawImage, Error> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: rgb.len(),
        })?;
    if rgb.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: rgb.len(),
        });
    }

    let data = rgb
        .chunks_exact(3)
        .map(|px| {
            let l = weights.r * f32::from(px[0])
                + weights.g * f32::from(px[1])
                + weights.b * f32::from(px[2]);
            (l / 255.0).clamp(0.0, 1.0)
        })
        .collect();

    Ok(RawImage::from_f32(width, height, data))
}
