use serde::{Deserialize, Serialize};

/// How samples outside the grid are resolved during convolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPolicy {
    /// Out-of-range samples read as 0.
    Zero,
    /// Out-of-range indices clamp to the nearest edge sample.
    #[default]
    Replicate,
    /// Mirror around the edge sample without repeating it (`dcb|abcd|cba`).
    Reflect101,
}

/// Maps a possibly out-of-range index onto `0..len`.
///
/// `None` means the sample does not exist and should be read as zero; that is
/// the only answer for [`BorderPolicy::Zero`] outside the range, and for any
/// policy when `len == 0`.
pub fn map_index(i: isize, len: usize, policy: BorderPolicy) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i >= 0 && (i as usize) < len {
        return Some(i as usize);
    }

    match policy {
        BorderPolicy::Zero => None,
        BorderPolicy::Replicate => {
            if i < 0 {
                Some(0)
            } else {
                Some(len - 1)
            }
        }
        BorderPolicy::Reflect101 => {
            if len == 1 {
                return Some(0);
            }

            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some((2 * len - 2) - r)
            }
        }
    }
}
