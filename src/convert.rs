//! Conversion orchestration.
//!
//! [`Converter::convert`] is the one entry point the web layer calls. It runs
//! the steps strictly in order (validate, parse, provider, check, count) and
//! recovers nothing itself: every failure comes back as a [`ConvertError`]
//! for the caller to show.
//!
//! Runs are admitted through a semaphore with `max_concurrent` slots and a
//! bounded number of waiters, so a burst of submissions queues briefly and
//! then fails fast with [`ConvertError::Busy`] instead of piling up
//! converter processes.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{file_key, stats, workspace};
use crate::provider::{CommandProvider, ConversionProvider};
use crate::request::ConversionRequest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info, warn};

/// Runs conversions against a provider, one slot at a time by default.
pub struct Converter {
    provider: Arc<dyn ConversionProvider>,
    config: ConversionConfig,
    slots: Semaphore,
    waiting: AtomicUsize,
}

impl Converter {
    /// A converter that runs the external program described by `config`.
    pub fn new(config: ConversionConfig) -> Self {
        let provider = Arc::new(CommandProvider::new(config.clone()));
        Self::with_provider(provider, config)
    }

    /// A converter backed by an arbitrary provider.
    pub fn with_provider(provider: Arc<dyn ConversionProvider>, config: ConversionConfig) -> Self {
        Self {
            provider,
            slots: Semaphore::new(config.max_concurrent.max(1)),
            waiting: AtomicUsize::new(0),
            config,
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert the design named by `request`.
    ///
    /// # Errors
    /// * input validation: [`ConvertError::MissingCredential`],
    ///   [`ConvertError::MissingUrl`], [`ConvertError::InvalidUrl`];
    ///   nothing is launched
    /// * [`ConvertError::Busy`]: the wait queue is full
    /// * any provider failure, unchanged
    /// * [`ConvertError::NoFilesGenerated`]: the provider succeeded but
    ///   both artifacts are empty
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutput, ConvertError> {
        let total_start = Instant::now();

        // ── Step 1: Validate input ───────────────────────────────────────────
        let file_key = validate(request)?;

        // ── Step 2: Wait for a slot ──────────────────────────────────────────
        let _permit = self.acquire_slot().await?;
        let run_id = workspace::new_run_id();
        info!("Starting conversion {} for file {}", run_id, file_key);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_conversion_start(&run_id, &file_key);
        }

        // ── Step 3: Run the provider ─────────────────────────────────────────
        let provider_start = Instant::now();
        let produced = match self
            .provider
            .convert(&run_id, &request.access_token, &file_key)
            .await
        {
            Ok(p) => p,
            Err(e) => return Err(self.report_failure(&run_id, e)),
        };
        let provider_duration_ms = provider_start.elapsed().as_millis() as u64;
        debug!(
            "Provider '{}' finished run {} in {}ms",
            self.provider.name(),
            run_id,
            provider_duration_ms
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_provider_complete(&run_id, provider_duration_ms);
        }

        // ── Step 4: Require at least one artifact ────────────────────────────
        if produced.markup.is_empty() && produced.stylesheet.is_empty() {
            let err = ConvertError::NoFilesGenerated {
                dir: produced.output_dir.clone().into(),
            };
            return Err(self.report_failure(&run_id, err));
        }

        // ── Step 5: Stats ────────────────────────────────────────────────────
        let element_count = stats::count_elements(&produced.markup.content);
        let stats = ConversionStats {
            element_count,
            provider_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };

        info!(
            "Conversion {} complete: {} elements, {}ms total",
            run_id, element_count, stats.total_duration_ms
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_conversion_complete(&run_id, element_count);
        }

        Ok(ConversionOutput {
            run_id,
            file_key,
            markup: produced.markup,
            stylesheet: produced.stylesheet,
            files: produced.files,
            log: produced.log,
            exit_code: produced.exit_code,
            output_dir: produced.output_dir,
            stats,
        })
    }

    async fn acquire_slot(&self) -> Result<SemaphorePermit<'_>, ConvertError> {
        if let Ok(permit) = self.slots.try_acquire() {
            return Ok(permit);
        }

        let limit = self.config.queue_limit;
        let queued = self.waiting.fetch_add(1, Ordering::SeqCst);
        let _guard = WaitGuard(&self.waiting);
        if queued >= limit {
            warn!("Rejecting conversion: {} already waiting", queued);
            return Err(ConvertError::Busy { limit });
        }
        debug!("Queued behind a running conversion ({} waiting)", queued + 1);

        self.slots
            .acquire()
            .await
            .map_err(|e| ConvertError::Internal(format!("conversion slots closed: {e}")))
    }

    fn report_failure(&self, run_id: &str, err: ConvertError) -> ConvertError {
        warn!("Conversion {} failed: {}", run_id, err);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_conversion_error(run_id, &err.to_string());
        }
        err
    }
}

/// Decrements the waiter count however the wait ends, including when the
/// caller's future is dropped mid-wait.
struct WaitGuard<'a>(&'a AtomicUsize);

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Check the operator's input and extract the file key.
pub fn validate(request: &ConversionRequest) -> Result<String, ConvertError> {
    if request.access_token.is_blank() {
        return Err(ConvertError::MissingCredential);
    }
    let url = request.figma_url.trim();
    if url.is_empty() {
        return Err(ConvertError::MissingUrl);
    }
    file_key::extract_file_key(url).ok_or_else(|| ConvertError::InvalidUrl {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Artifact, ProviderOutput};
    use crate::progress::ConversionProgressCallback;
    use crate::request::AccessToken;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns canned artifacts and records every call.
    struct StubProvider {
        markup: &'static str,
        stylesheet: &'static str,
        fail: bool,
        delay: Duration,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubProvider {
        fn new(markup: &'static str, stylesheet: &'static str) -> Self {
            Self {
                markup,
                stylesheet,
                fail: false,
                delay: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ConversionProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn convert(
            &self,
            run_id: &str,
            token: &AccessToken,
            file_key: &str,
        ) -> Result<ProviderOutput, ConvertError> {
            self.calls
                .lock()
                .unwrap()
                .push((token.expose().to_string(), file_key.to_string()));
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(ConvertError::ProviderFailed {
                    exit_code: Some(1),
                    detail: "boom".into(),
                });
            }
            Ok(ProviderOutput {
                markup: Artifact::new("index.html", self.markup),
                stylesheet: Artifact::new("styles.css", self.stylesheet),
                files: vec![],
                log: "ok".into(),
                exit_code: Some(0),
                output_dir: format!("mem/{run_id}"),
            })
        }
    }

    fn converter(stub: Arc<StubProvider>, config: ConversionConfig) -> Converter {
        Converter::with_provider(stub, config)
    }

    fn request(url: &str) -> ConversionRequest {
        ConversionRequest::new("figd_token", url)
    }

    #[test]
    fn validate_order_and_messages() {
        assert!(matches!(
            validate(&ConversionRequest::new("", "")),
            Err(ConvertError::MissingCredential)
        ));
        assert!(matches!(
            validate(&ConversionRequest::new("t", "   ")),
            Err(ConvertError::MissingUrl)
        ));
        assert!(matches!(
            validate(&ConversionRequest::new("t", "https://example.com/foo")),
            Err(ConvertError::InvalidUrl { .. })
        ));
        assert_eq!(
            validate(&ConversionRequest::new("t", " https://figma.com/file/Q9 ")).unwrap(),
            "Q9"
        );
    }

    #[tokio::test]
    async fn success_counts_elements_and_passes_key() {
        let stub = Arc::new(StubProvider::new("<div class=x><div>", "div{}"));
        let c = converter(stub.clone(), ConversionConfig::default());

        let out = c
            .convert(&request("https://figma.com/design/ABC123/My-Project"))
            .await
            .unwrap();
        assert_eq!(out.file_key, "ABC123");
        assert_eq!(out.stats.element_count, 2);
        assert_eq!(out.markup.content, "<div class=x><div>");
        assert!(out.run_id.starts_with("run-"));
        assert_eq!(
            *stub.calls.lock().unwrap(),
            vec![("figd_token".to_string(), "ABC123".to_string())]
        );
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_provider() {
        let stub = Arc::new(StubProvider::new("<div>", ""));
        let c = converter(stub.clone(), ConversionConfig::default());
        let err = c.convert(&request("https://example.com/foo")).await.unwrap_err();
        assert!(err.is_input_error());
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_artifacts_are_no_files_generated() {
        let stub = Arc::new(StubProvider::new("", ""));
        let c = converter(stub, ConversionConfig::default());
        let err = c
            .convert(&request("https://figma.com/design/K"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoFilesGenerated { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn stylesheet_only_is_a_success() {
        let stub = Arc::new(StubProvider::new("", "a{}"));
        let c = converter(stub, ConversionConfig::default());
        let out = c.convert(&request("https://figma.com/design/K")).await.unwrap();
        assert_eq!(out.stats.element_count, 0);
        assert_eq!(out.stylesheet.content, "a{}");
    }

    #[tokio::test]
    async fn provider_failure_propagates_and_notifies() {
        #[derive(Default)]
        struct Errors(Mutex<Vec<String>>);
        impl ConversionProgressCallback for Errors {
            fn on_conversion_error(&self, _run_id: &str, error: &str) {
                self.0.lock().unwrap().push(error.to_string());
            }
        }

        let errors = Arc::new(Errors::default());
        let config = ConversionConfig::builder()
            .progress_callback(errors.clone())
            .build()
            .unwrap();
        let mut stub = StubProvider::new("", "");
        stub.fail = true;
        let c = converter(Arc::new(stub), config);

        let err = c
            .convert(&request("https://figma.com/design/K"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::ProviderFailed { .. }));
        assert_eq!(errors.0.lock().unwrap().len(), 1);
        assert!(errors.0.lock().unwrap()[0].contains("boom"));
    }

    #[tokio::test]
    async fn full_queue_is_busy() {
        let mut stub = StubProvider::new("<div>", "");
        stub.delay = Duration::from_millis(300);
        let config = ConversionConfig::builder().queue_limit(0).build().unwrap();
        let c = Arc::new(converter(Arc::new(stub), config));

        let first = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.convert(&request("https://figma.com/design/A")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = c
            .convert(&request("https://figma.com/design/B"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Busy { limit: 0 }), "got: {err:?}");
        assert!(first.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn queued_run_proceeds_after_slot_frees() {
        let mut stub = StubProvider::new("<div>", "");
        stub.delay = Duration::from_millis(100);
        let c = Arc::new(converter(Arc::new(stub), ConversionConfig::default()));

        let a = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.convert(&request("https://figma.com/design/A")).await })
        };
        let b = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.convert(&request("https://figma.com/design/B")).await })
        };
        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_ne!(a.run_id, b.run_id);
        assert_eq!(c.waiting.load(Ordering::SeqCst), 0);
    }
}
