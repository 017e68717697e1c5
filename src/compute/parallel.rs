//! Backend-dispatched index mapping.
//!
//! Bulk work that is independent per index runs on the rayon pool when the
//! context selects [`Backend::Parallel`], and on the calling thread otherwise.
//! Results always come back in index order.

use crate::core::{Backend, ComputeContext};
use crate::error::Result;
use rayon::prelude::*;

/// Map `f` over `0..n`.
pub fn map_indices<T, F>(ctx: &ComputeContext, n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    match ctx.backend() {
        Backend::Parallel => (0..n).into_par_iter().map(f).collect(),
        Backend::Sequential => (0..n).map(f).collect(),
    }
}

/// Map a fallible `f` over `0..n`, stopping at the first error.
pub fn try_map_indices<T, F>(ctx: &ComputeContext, n: usize, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync + Send,
{
    match ctx.backend() {
        Backend::Parallel => (0..n).into_par_iter().map(f).collect(),
        Backend::Sequential => (0..n).map(f).collect(),
    }
}
