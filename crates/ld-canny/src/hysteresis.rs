//! Hysteresis edge linking with an explicit worklist.
//!
//! Strong pixels seed the worklist; popping a pixel promotes every
//! 8-connected weak neighbor to strong and pushes it. A pixel is pushed only
//! on its transition to strong, so each one is expanded exactly once and the
//! work is bounded by the pixel count regardless of image size. Weak pixels
//! left at the fixed point are demoted to background.
//!
//! The final classification depends only on reachability, so depth-first and
//! breadth-first propagation agree.

use std::collections::VecDeque;

use ld_core::Image;

use crate::{ClassificationGrid, EdgeClass};

/// Worklist discipline used during propagation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Propagation {
    /// LIFO stack.
    #[default]
    DepthFirst,
    /// FIFO queue.
    BreadthFirst,
}

trait Worklist {
    fn push(&mut self, idx: usize);
    fn pop(&mut self) -> Option<usize>;
}

impl Worklist for Vec<usize> {
    fn push(&mut self, idx: usize) {
        Vec::push(self, idx);
    }

    fn pop(&mut self) -> Option<usize> {
        Vec::pop(self)
    }
}

impl Worklist for VecDeque<usize> {
    fn push(&mut self, idx: usize) {
        self.push_back(idx);
    }

    fn pop(&mut self) -> Option<usize> {
        self.pop_front()
    }
}

/// Links weak pixels to strong ones; the result holds only background and
/// strong pixels.
pub fn link_edges(mut grid: ClassificationGrid, order: Propagation) -> ClassificationGrid {
    let (w, h) = grid.dims();
    let classes = grid.classes_mut().data_mut();

    let promoted = match order {
        Propagation::DepthFirst => propagate(classes, w, h, Vec::new()),
        Propagation::BreadthFirst => propagate(classes, w, h, VecDeque::new()),
    };
    log::trace!("hysteresis promoted {promoted} weak pixels");

    for c in classes.iter_mut() {
        if *c == EdgeClass::Weak {
            *c = EdgeClass::Background;
        }
    }

    grid
}

fn propagate<W: Worklist>(classes: &mut [EdgeClass], w: usize, h: usize, mut work: W) -> usize {
    for (idx, c) in classes.iter().enumerate() {
        if *c == EdgeClass::Strong {
            work.push(idx);
        }
    }

    let mut promoted = 0usize;
    while let Some(idx) = work.pop() {
        let x = idx % w;
        let y = idx / w;

        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(h - 1);
        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(w - 1);

        for ny in y0..=y1 {
            for nx in x0..=x1 {
                let nidx = ny * w + nx;
                if classes[nidx] == EdgeClass::Weak {
                    classes[nidx] = EdgeClass::Strong;
                    work.push(nidx);
                    promoted += 1;
                }
            }
        }
    }

    promoted
}

/// Final pipeline output: `0` or the strong marker at every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    image: Image<u8>,
    strong_value: u8,
}

impl EdgeMap {
    /// Renders a linked grid; anything not strong becomes `0`.
    pub fn from_linked(grid: &ClassificationGrid, strong_value: u8) -> Self {
        let image = grid.classes().map(|&c| match c {
            EdgeClass::Strong => strong_value,
            EdgeClass::Weak | EdgeClass::Background => 0,
        });
        Self {
            image,
            strong_value,
        }
    }

    pub fn image(&self) -> &Image<u8> {
        &self.image
    }

    pub fn into_image(self) -> Image<u8> {
        self.image
    }

    pub fn strong_value(&self) -> u8 {
        self.strong_value
    }

    pub fn dims(&self) -> (usize, usize) {
        self.image.dims()
    }

    pub fn strong_count(&self) -> usize {
        self.image
            .data()
            .iter()
            .filter(|&&v| v == self.strong_value)
            .count()
    }
}
