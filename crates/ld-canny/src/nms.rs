//! Non-maximum suppression along the quantized gradient direction.
//!
//! A pixel keeps its magnitude when it is `>=` both neighbors along its
//! direction (ties survive, so plateaus two pixels wide stay two wide).
//! The outer 1-pixel frame, and any pixel without a direction, is zeroed.
//!
//! Re-running suppression on its own output with the same directions is a
//! no-op: survivors only ever lose neighbors, never gain them.

use ld_core::Image;

use crate::GradientField;

pub fn suppress(field: &GradientField) -> Image<f32> {
    let (w, h) = field.dims();
    let mut out = Image::new_fill(w, h, 0.0f32);
    if w < 3 || h < 3 {
        return out;
    }

    let mag = field.magnitude().data();
    let dir = field.direction().data();
    let thin = out.data_mut();

    for y in 1..(h - 1) {
        for x in 1..(w - 1) {
            let idx = y * w + x;
            let m = mag[idx];
            if m <= 0.0 {
                continue;
            }
            let Some(d) = dir[idx] else {
                continue;
            };

            let [(dx1, dy1), (dx2, dy2)] = d.neighbor_offsets();
            let n1 = mag[offset_index(x, y, dx1, dy1, w)];
            let n2 = mag[offset_index(x, y, dx2, dy2, w)];

            if m >= n1 && m >= n2 {
                thin[idx] = m;
            }
        }
    }

    out
}

/// Caller guarantees `(x, y)` is an interior pixel and `|dx|, |dy| <= 1`.
#[inline]
fn offset_index(x: usize, y: usize, dx: isize, dy: isize, w: usize) -> usize {
    let nx = x.wrapping_add_signed(dx);
    let ny = y.wrapping_add_signed(dy);
    ny * w + nx
}

#[cfg(test)]
mod tests {
    use ld_core::Image;

    use super::suppress;
    use crate::{Direction, GradientField, sobel_gradients};

    fn field(w: usize, h: usize, mag: Vec<f32>, d: Direction) -> GradientField {
        let magnitude = Image::from_vec(w, h, mag).expect("valid magnitude");
        let direction = Image::new_fill(w, h, Some(d));
        GradientField::from_parts(magnitude, direction).expect("matching dims")
    }

    #[test]
    fn keeps_ridge_crest_across_gradient() {
        #[rustfmt::skip]
        let mag = vec![
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 3.0, 2.0, 0.0,
            0.0, 1.0, 3.0, 2.0, 0.0,
            0.0, 1.0, 3.0, 2.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        let thin = suppress(&field(5, 5, mag, Direction::Deg0));

        for y in 1..4 {
            assert_eq!(thin.row(y), &[0.0, 0.0, 3.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn direction_selects_the_compared_neighbors() {
        // Center 2.0 beats its horizontal neighbors but not the pixel above.
        #[rustfmt::skip]
        let mag = vec![
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 5.0, 0.0, 0.0,
            0.0, 1.0, 2.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        let horiz = suppress(&field(5, 5, mag.clone(), Direction::Deg0));
        let vert = suppress(&field(5, 5, mag.clone(), Direction::Deg90));
        let diag = suppress(&field(5, 5, mag, Direction::Deg45));

        assert_eq!(*horiz.get(2, 2).expect("center"), 2.0);
        assert_eq!(*vert.get(2, 2).expect("center"), 0.0);
        assert_eq!(*diag.get(2, 2).expect("center"), 2.0);
    }

    #[test]
    fn ties_survive() {
        #[rustfmt::skip]
        let mag = vec![
            0.0, 0.0, 0.0, 0.0,
            0.0, 2.0, 2.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
        ];
        let thin = suppress(&field(4, 3, mag, Direction::Deg0));
        assert_eq!(thin.row(1), &[0.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn frame_is_forced_to_zero() {
        let thin = suppress(&field(4, 4, vec![9.0; 16], Direction::Deg0));
        for y in 0..4 {
            for x in 0..4 {
                let border = x == 0 || y == 0 || x == 3 || y == 3;
                let v = *thin.get(x, y).expect("in bounds");
                assert_eq!(v, if border { 0.0 } else { 9.0 });
            }
        }
    }

    #[test]
    fn suppression_is_idempotent() {
        let (w, h) = (24usize, 20usize);
        let data: Vec<f32> = (0..w * h)
            .map(|i| {
                let (x, y) = ((i % w) as f32, (i / w) as f32);
                (0.3 * x).sin() * (0.2 * y).cos() + 0.05 * x
            })
            .collect();
        let img = Image::from_vec(w, h, data).expect("valid image");
        let g = sobel_gradients(&img);

        let once = suppress(&g);
        let again = GradientField::from_parts(once.clone(), g.direction().clone())
            .expect("matching dims");
        assert_eq!(suppress(&again), once);
    }
}
