//! # Blendshapes
//!
//! Turns the discrete viseme timeline into smooth per-frame blendshape weights.

mod animator;
mod interpolator;

pub use animator::{BlendshapeWeights, MouthAnimator};
pub use interpolator::{BlendshapeInterpolator, DEFAULT_INTERPOLATION_RATE, interpolate_weight};
