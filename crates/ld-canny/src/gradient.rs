//! Sobel gradients with magnitude and 4-bucket unsigned direction.
//!
//! - Interior pixels get `gx`, `gy` from the 3x3 Sobel pair and
//!   `mag = sqrt(gx^2 + gy^2)`.
//! - Direction folds `atan2(gy, gx)` into `[0°, 180°)` and rounds to the
//!   nearest of 0°, 45°, 90°, 135°; exact midpoints go to the lower bucket
//!   and 180° wraps to 0°.
//! - The outermost 1-pixel frame has no full 3x3 neighborhood: magnitude 0,
//!   direction `None`.
//!
//! Image y grows downward, so a 45° gradient points toward `(+x, +y)`.

use ld_core::{Error, Image};

/// Quantized, unsigned gradient direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Deg0 = 0,
    Deg45 = 1,
    Deg90 = 2,
    Deg135 = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Deg0, Self::Deg45, Self::Deg90, Self::Deg135];

    /// Buckets an arbitrary angle in degrees.
    pub fn from_degrees(angle: f32) -> Self {
        let folded = angle.rem_euclid(180.0);
        // Round half down: `ceil(q - 0.5)` sends q = k + 0.5 to k.
        let bucket = (folded / 45.0 - 0.5).ceil() as i32;
        match bucket.rem_euclid(4) {
            0 => Self::Deg0,
            1 => Self::Deg45,
            2 => Self::Deg90,
            _ => Self::Deg135,
        }
    }

    pub fn from_gradient(gx: f32, gy: f32) -> Self {
        Self::from_degrees(gy.atan2(gx).to_degrees())
    }

    pub fn degrees(self) -> f32 {
        45.0 * f32::from(self as u8)
    }

    /// `(dx, dy)` of the two neighbors lying along the gradient.
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            Self::Deg0 => [(-1, 0), (1, 0)],
            Self::Deg45 => [(-1, -1), (1, 1)],
            Self::Deg90 => [(0, -1), (0, 1)],
            Self::Deg135 => [(1, -1), (-1, 1)],
        }
    }
}

/// Co-indexed magnitude and direction grids.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    magnitude: Image<f32>,
    direction: Image<Option<Direction>>,
}

impl GradientField {
    pub fn from_parts(
        magnitude: Image<f32>,
        direction: Image<Option<Direction>>,
    ) -> Result<Self, Error> {
        if !magnitude.same_dims(&direction) {
            return Err(Error::SizeMismatch {
                expected: magnitude.data().len(),
                actual: direction.data().len(),
            });
        }
        Ok(Self {
            magnitude,
            direction,
        })
    }

    pub fn magnitude(&self) -> &Image<f32> {
        &self.magnitude
    }

    pub fn direction(&self) -> &Image<Option<Direction>> {
        &self.direction
    }

    pub fn dims(&self) -> (usize, usize) {
        self.magnitude.dims()
    }

    pub fn into_parts(self) -> (Image<f32>, Image<Option<Direction>>) {
        (self.magnitude, self.direction)
    }
}

pub fn sobel_gradients(src: &Image<f32>) -> GradientField {
    let (w, h) = src.dims();
    let mut magnitude = Image::new_fill(w, h, 0.0f32);
    let mut direction = Image::new_fill(w, h, None);

    if w >= 3 && h >= 3 {
        let mag = magnitude.data_mut();
        let dir = direction.data_mut();

        for y in 1..(h - 1) {
            let r0 = src.row(y - 1);
            let r1 = src.row(y);
            let r2 = src.row(y + 1);
            for x in 1..(w - 1) {
                let (p00, p01, p02) = (r0[x - 1], r0[x], r0[x + 1]);
                let (p10, p12) = (r1[x - 1], r1[x + 1]);
                let (p20, p21, p22) = (r2[x - 1], r2[x], r2[x + 1]);

                let gx = (p02 + 2.0 * p12 + p22) - (p00 + 2.0 * p10 + p20);
                let gy = (p20 + 2.0 * p21 + p22) - (p00 + 2.0 * p01 + p02);

                let idx = y * w + x;
                mag[idx] = (gx * gx + gy * gy).sqrt();
                dir[idx] = Some(Direction::from_gradient(gx, gy));
            }
        }
    }

    GradientField {
        magnitude,
        direction,
    }
}
