//! Progress-callback trait for run lifecycle events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! when a run starts, when the converter returns, and how the run ended.
//!
//! # Example
//!
//! ```rust
//! use figma2html_web::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     finished: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_conversion_complete(&self, run_id: &str, element_count: usize) {
//!         self.finished.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{run_id}: {element_count} elements");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { finished: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;
use tracing::{info, warn};

/// Called by [`crate::convert::Converter`] as a run moves through its steps.
///
/// Implementations must be `Send + Sync`: several runs may be in flight when
/// `max_concurrent > 1`. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the run holds a slot and is about to launch the provider.
    fn on_conversion_start(&self, run_id: &str, file_key: &str) {
        let _ = (run_id, file_key);
    }

    /// Called when the provider returned successfully.
    ///
    /// # Arguments
    /// * `elapsed_ms`: wall-clock time spent inside the provider
    fn on_provider_complete(&self, run_id: &str, elapsed_ms: u64) {
        let _ = (run_id, elapsed_ms);
    }

    /// Called after a successful run, with the display-only element count.
    fn on_conversion_complete(&self, run_id: &str, element_count: usize) {
        let _ = (run_id, element_count);
    }

    /// Called when a run that got past input validation fails.
    fn on_conversion_error(&self, run_id: &str, error: &str) {
        let _ = (run_id, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Forwards every event to `tracing`. Used by the web server.
pub struct TracingProgressCallback;

impl ConversionProgressCallback for TracingProgressCallback {
    fn on_conversion_start(&self, run_id: &str, file_key: &str) {
        info!(run_id, file_key, "conversion started");
    }

    fn on_provider_complete(&self, run_id: &str, elapsed_ms: u64) {
        info!(run_id, elapsed_ms, "converter finished");
    }

    fn on_conversion_complete(&self, run_id: &str, element_count: usize) {
        info!(run_id, element_count, "conversion complete");
    }

    fn on_conversion_error(&self, run_id: &str, error: &str) {
        warn!(run_id, error, "conversion failed");
    }
}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
