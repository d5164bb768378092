use ld_canny::EdgeMap;
use ld_core::ImageView;

/// Occurrences of `value` in a (possibly strided) view.
pub fn count_value(view: &ImageView<'_, u8>, value: u8) -> usize {
    view.samples().filter(|&&v| v == value).count()
}

pub fn strong_pixels(map: &EdgeMap) -> usize {
    count_value(&map.image().as_view(), map.strong_value())
}

/// `sample / reference`, or `None` for an empty reference.
pub fn density_ratio(sample: usize, reference: usize) -> Option<f64> {
    if reference == 0 {
        return None;
    }
    Some(sample as f64 / reference as f64)
}
