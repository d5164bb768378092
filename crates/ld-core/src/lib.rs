//! Foundational grid primitives for the lane-density edge pipeline.
//!
//! ## Layout
//! Every grid is a flat, row-major buffer: sample `(x, y)` lives at
//! `data[y * width + x]`. Owned grids are always contiguous; borrowed
//! [`ImageView`]s carry an element stride (distance between row starts, in
//! elements) so callers can wrap padded buffers without copying.
//!
//! ## Input Domain
//! Raw samples arrive either as bytes in `[0, 255]` or as floats already in
//! `[0, 1]`. [`RawImage::to_unit_image`] is the single place where the two
//! are normalized; everything downstream works on `Image<f32>` in `[0, 1]`.
//!
//! ## Border Policies
//! [`map_index`] resolves out-of-range indices for zero padding, replicate
//! (clamp) and reflect-101. Zero padding resolves to `None`, meaning "treat
//! the sample as 0".

mod border;
mod error;
mod gray;
mod image;
mod raw;

pub use border::{BorderPolicy, map_index};
pub use error::{Error, InputError};
pub use gray::{GrayWeights, luma_from_rgb8};
pub use image::{Image, ImageView};
pub use raw::{RawImage, Samples};
