//! Cooperative cancellation
//!
//! The orchestrator checks the token between file batches during the
//! parallel parse phase and before each graph-global step. An in-flight
//! parse of a single file is allowed to complete; cancellation is
//! deliberately coarse-grained.

use crate::error::{Result, RippleError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; safe to call from any thread
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Err(Interrupted) once cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(RippleError::interrupted())
        } else {
            Ok(())
        }
    }
}
