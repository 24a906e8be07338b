//! # changemask algorithms
//!
//! Change detection algorithms for co-registered raster pairs.
//!
//! ## Available Algorithm Categories
//!
//! - **imagery**: band normalization, directional change detection

pub(crate) mod maybe_rayon;
pub mod imagery;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        detect_changes, normalize, ChangeDetectionParams, ChangeMasks, DEFAULT_THRESHOLD,
    };
    pub use changemask_core::prelude::*;
}
