//! # changemask colormap
//!
//! Turns boolean change masks into an 8-bit RGB overlay.
//!
//! ## Usage
//!
//! ```ignore
//! use changemask_colormap::composite;
//!
//! let overlay = composite(&masks.added, &masks.removed)?;
//! ```

mod overlay;
mod scheme;

pub use overlay::composite;
pub use scheme::{Rgb, ADDED_COLOR, REMOVED_COLOR};
