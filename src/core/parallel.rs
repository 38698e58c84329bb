//! Parallel processing utilities

use crate::core::cancel::CancelToken;
use crate::error::{Result, RippleError};
use rayon::prelude::*;

/// Progress update information for parallel operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Execute a function over items in batches, in input order.
///
/// Items within a batch run on a local rayon pool; the cancel token is
/// checked between batches so a long scan can be abandoned without
/// tearing down an in-flight parse. Output order always matches input
/// order regardless of thread scheduling, which is what makes graph
/// assembly deterministic downstream.
pub fn process_batched<T, R, F, P>(
    items: Vec<T>,
    batch_size: usize,
    parallel: bool,
    threads: Option<usize>,
    cancel: &CancelToken,
    f: F,
    progress: Option<P>,
) -> Result<Vec<R>>
where
    T: Send + Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
    P: Fn(ProgressUpdate),
{
    let total = items.len();
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(total);

    let pool = if parallel {
        let num_threads = threads.unwrap_or_else(num_cpus::get);
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|e| RippleError::config_error(format!("thread pool: {}", e)))?,
        )
    } else {
        None
    };

    for batch in items.chunks(batch_size) {
        cancel.check()?;

        let mut batch_results: Vec<R> = match &pool {
            Some(pool) => pool.install(|| batch.par_iter().map(&f).collect()),
            None => batch.iter().map(&f).collect(),
        };
        results.append(&mut batch_results);

        if let Some(progress) = &progress {
            progress(ProgressUpdate::new(
                results.len(),
                total,
                format!("Parsed {}/{} files", results.len(), total),
            ));
        }
    }

    Ok(results)
}
