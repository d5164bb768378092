//! Umbrella crate for the `lane-density` workspace.
//!
//! Re-exports the image core, the edge pipeline and the density lookup so
//! applications need a single dependency.

pub use ld_canny::*;
pub use ld_core::*;
pub use ld_density::*;
