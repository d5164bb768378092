//! Gaussian smoothing by direct 2D convolution.
//!
//! The kernel is symmetric, so correlation and convolution coincide and the
//! window is applied without flipping. Pixels whose window fits inside the
//! image take a fast path without index mapping; the remaining frame resolves
//! every tap through [`map_index`]. Both paths accumulate taps in the same
//! row-major order, so a constant input under replicate or reflect-101 stays
//! bit-exactly constant.

use ld_core::{BorderPolicy, Image, map_index};

use crate::GaussianKernel;

pub fn smooth(src: &Image<f32>, kernel: &GaussianKernel, border: BorderPolicy) -> Image<f32> {
    let (w, h) = src.dims();
    let mut out = Image::new_fill(w, h, 0.0f32);
    if w == 0 || h == 0 {
        return out;
    }

    let r = kernel.radius();
    for y in 0..h {
        let row_inside = y >= r && y + r < h;
        let out_row = out.row_mut(y);
        for (x, out_px) in out_row.iter_mut().enumerate() {
            *out_px = if row_inside && x >= r && x + r < w {
                window_inside(src, kernel, x - r, y - r)
            } else {
                window_mapped(src, kernel, x, y, border)
            };
        }
    }

    out
}

/// Window with top-left corner `(x0, y0)`, fully inside the image.
#[inline]
fn window_inside(src: &Image<f32>, kernel: &GaussianKernel, x0: usize, y0: usize) -> f32 {
    let k = kernel.size();
    let mut acc = 0.0f32;
    for (ky, k_row) in kernel.weights().chunks_exact(k).enumerate() {
        let s_row = &src.row(y0 + ky)[x0..x0 + k];
        for (&s, &kv) in s_row.iter().zip(k_row) {
            acc += s * kv;
        }
    }
    acc
}

fn window_mapped(
    src: &Image<f32>,
    kernel: &GaussianKernel,
    x: usize,
    y: usize,
    border: BorderPolicy,
) -> f32 {
    let (w, h) = src.dims();
    let k = kernel.size();
    let r = kernel.radius() as isize;

    let mut acc = 0.0f32;
    for (ky, k_row) in kernel.weights().chunks_exact(k).enumerate() {
        let Some(sy) = map_index(y as isize + ky as isize - r, h, border) else {
            continue;
        };
        let s_row = src.row(sy);
        for (kx, &kv) in k_row.iter().enumerate() {
            if let Some(sx) = map_index(x as isize + kx as isize - r, w, border) {
                acc += s_row[sx] * kv;
            }
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use ld_core::{BorderPolicy, Image};

    use super::smooth;
    use crate::GaussianKernel;

    #[test]
    fn impulse_reproduces_kernel() {
        let (w, h) = (7usize, 7usize);
        let mut data = vec![0.0f32; w * h];
        data[3 * w + 3] = 1.0;
        let img = Image::from_vec(w, h, data).expect("valid image");
        let k = GaussianKernel::new(1.0, 3).expect("valid kernel");

        let out = smooth(&img, &k, BorderPolicy::Zero);
        for j in 0..3 {
            for i in 0..3 {
                let v = *out.get(2 + i, 2 + j).expect("in bounds");
                assert!((v - k.get(j, i).expect("in kernel")).abs() < 1e-7);
            }
        }
        assert_eq!(*out.get(0, 0).expect("in bounds"), 0.0);
    }

    #[test]
    fn constant_survives_replicate_and_reflect_exactly() {
        let img = Image::new_fill(9, 6, 0.6f32);
        let k = GaussianKernel::new(1.4, 5).expect("valid kernel");

        for border in [BorderPolicy::Replicate, BorderPolicy::Reflect101] {
            let out = smooth(&img, &k, border);
            let first = out.data()[0];
            assert!(out.data().iter().all(|&v| v == first), "{border:?}");
            assert!((first - 0.6).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_padding_darkens_the_frame_only() {
        let img = Image::new_fill(9, 9, 1.0f32);
        let k = GaussianKernel::new(1.0, 3).expect("valid kernel");
        let out = smooth(&img, &k, BorderPolicy::Zero);

        let corner = *out.get(0, 0).expect("corner");
        let edge = *out.get(4, 0).expect("edge");
        let center = *out.get(4, 4).expect("center");
        assert!(corner < edge && edge < center);
        assert!((center - 1.0).abs() < 1e-5);
    }

    #[test]
    fn kernel_larger_than_image_keeps_dims() {
        let img = Image::from_vec(2, 1, vec![0.0f32, 1.0]).expect("valid image");
        let k = GaussianKernel::new(2.0, 7).expect("valid kernel");
        let out = smooth(&img, &k, BorderPolicy::Replicate);
        assert_eq!(out.dims(), (2, 1));
        assert!(out.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
