//! Physical models of the household's storage and generation.

/// Battery state-of-charge envelope.
pub mod battery;
/// Solar PV generation estimate.
pub mod solar;

pub use battery::Battery;
pub use solar::{Orientation, calculate_scaling_factor, estimate_generation};
