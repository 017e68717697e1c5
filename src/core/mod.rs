//! Core data structures: series batches and the compute context.

mod batch;
mod context;

pub use batch::{Batch, Precision, ValueLayout};
pub use context::{Backend, ComputeContext, ContextInfo};
