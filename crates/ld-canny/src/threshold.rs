//! Double thresholding with cutoffs relative to the per-image maximum.

use ld_core::Image;

/// Per-pixel edge classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EdgeClass {
    #[default]
    Background = 0,
    Weak = 1,
    Strong = 2,
}

/// Absolute cutoffs derived from the ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub max_magnitude: f32,
    pub low: f32,
    pub high: f32,
}

impl Thresholds {
    /// `None` when the thinned grid has no positive magnitude; no division or
    /// scaling happens in that case.
    pub fn from_ratios(thin: &Image<f32>, low_ratio: f32, high_ratio: f32) -> Option<Self> {
        let max_magnitude = thin.data().iter().copied().fold(0.0f32, f32::max);
        if max_magnitude <= 0.0 {
            return None;
        }

        Some(Self {
            max_magnitude,
            low: low_ratio * max_magnitude,
            high: high_ratio * max_magnitude,
        })
    }

    pub fn class_of(&self, magnitude: f32) -> EdgeClass {
        if magnitude >= self.high {
            EdgeClass::Strong
        } else if magnitude >= self.low {
            EdgeClass::Weak
        } else {
            EdgeClass::Background
        }
    }
}

/// Classified grid plus the cutoffs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationGrid {
    classes: Image<EdgeClass>,
    thresholds: Option<Thresholds>,
}

impl ClassificationGrid {
    pub fn new(classes: Image<EdgeClass>, thresholds: Option<Thresholds>) -> Self {
        Self {
            classes,
            thresholds,
        }
    }

    pub fn classes(&self) -> &Image<EdgeClass> {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut Image<EdgeClass> {
        &mut self.classes
    }

    /// `None` for an edge-free image.
    pub fn thresholds(&self) -> Option<&Thresholds> {
        self.thresholds.as_ref()
    }

    pub fn dims(&self) -> (usize, usize) {
        self.classes.dims()
    }

    pub fn count(&self, class: EdgeClass) -> usize {
        self.classes.data().iter().filter(|&&c| c == class).count()
    }

    /// Renders classes to marker values (`0`, `weak`, `strong`).
    pub fn to_markers(&self, weak: u8, strong: u8) -> Image<u8> {
        self.classes.map(|c| match c {
            EdgeClass::Background => 0,
            EdgeClass::Weak => weak,
            EdgeClass::Strong => strong,
        })
    }
}

pub fn classify(thin: &Image<f32>, low_ratio: f32, high_ratio: f32) -> ClassificationGrid {
    let (w, h) = thin.dims();
    let Some(thresholds) = Thresholds::from_ratios(thin, low_ratio, high_ratio) else {
        return ClassificationGrid::new(Image::new_fill(w, h, EdgeClass::Background), None);
    };

    let classes = thin.map(|&m| thresholds.class_of(m));
    ClassificationGrid::new(classes, Some(thresholds))
}
