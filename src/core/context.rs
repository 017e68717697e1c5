//! Compute context shared by all batch operations.
//!
//! The context carries the execution backend and an optional memory budget.
//! It is created once, then passed by shared reference into every operation
//! and never mutated while a computation is in flight.

use crate::error::{Result, TsError};
use std::fmt;

/// Execution backend for bulk array work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Data-parallel execution on the rayon thread pool.
    #[default]
    Parallel,
    /// Single-threaded execution on the calling thread.
    Sequential,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Parallel => write!(f, "parallel"),
            Backend::Sequential => write!(f, "sequential"),
        }
    }
}

/// Configuration for the array-compute layer.
///
/// # Example
///
/// ```
/// use tsbatch::core::{Backend, ComputeContext};
///
/// let ctx = ComputeContext::new()
///     .with_backend(Backend::Sequential)
///     .with_memory_budget(64 * 1024 * 1024);
/// assert_eq!(ctx.backend(), Backend::Sequential);
/// assert!(ctx.ensure_fits(1024).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComputeContext {
    backend: Backend,
    memory_budget: Option<usize>,
}

impl ComputeContext {
    /// Parallel backend without a memory budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the execution backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Cap the size of any single bulk allocation, in bytes.
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    #[inline]
    pub fn memory_budget(&self) -> Option<usize> {
        self.memory_budget
    }

    /// Fail if a bulk allocation of `bytes` would exceed the budget.
    pub fn ensure_fits(&self, bytes: usize) -> Result<()> {
        match self.memory_budget {
            Some(budget) if bytes > budget => Err(TsError::ResourceExhausted {
                requested: bytes,
                budget,
            }),
            _ => Ok(()),
        }
    }

    /// Number of worker threads bulk operations will use.
    pub fn threads(&self) -> usize {
        match self.backend {
            Backend::Parallel => rayon::current_num_threads(),
            Backend::Sequential => 1,
        }
    }

    /// Library version and active configuration.
    pub fn info(&self) -> ContextInfo {
        ContextInfo {
            version: env!("CARGO_PKG_VERSION"),
            backend: self.backend,
            threads: self.threads(),
            memory_budget: self.memory_budget,
        }
    }
}

/// Snapshot of the library version and compute configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub version: &'static str,
    pub backend: Backend,
    pub threads: usize,
    pub memory_budget: Option<usize>,
}

impl fmt::Display for ContextInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tsbatch {} (backend: {}, threads: {}",
            self.version, self.backend, self.threads
        )?;
        match self.memory_budget {
            Some(budget) => write!(f, ", memory budget: {} bytes)", budget),
            None => write!(f, ", memory budget: unlimited)"),
        }
    }
}
