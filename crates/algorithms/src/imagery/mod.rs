//! Imagery analysis algorithms
//!
//! Algorithms for before/after image comparison:
//! - Normalize: per-band min-max rescaling to [0, 1]
//! - Change detection: directional (added/removed) change masks

mod change_detection;
mod normalize;

pub use change_detection::{
    detect_changes, ChangeDetectionParams, ChangeMasks, DEFAULT_THRESHOLD,
};
pub use normalize::{band_range, normalize};
