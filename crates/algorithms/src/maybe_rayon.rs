//! Switch between rayon and sequential iteration.
//!
//! Normalization iterates bands and change detection iterates rows through
//! `into_par_iter()`. With the `parallel` feature that is rayon; without it
//! the same call falls back to `into_iter()`, so `.flat_map()`, `.unzip()`
//! and `.collect()` resolve to the standard `Iterator` methods and produce
//! identical output.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
