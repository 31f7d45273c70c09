//! Configuration types for running the external converter.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Every knob lives in one struct so the
//! web layer, the binary and the tests share the same defaults.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default environment variable carrying the access token to the converter.
pub const DEFAULT_TOKEN_ENV: &str = "FIGMA_ACCESS_TOKEN";
/// Default environment variable carrying the file key to the converter.
pub const DEFAULT_FILE_KEY_ENV: &str = "FIGMA_URL";
/// Default environment variable carrying the run's output directory.
pub const DEFAULT_OUTPUT_DIR_ENV: &str = "FIGMA_OUTPUT_DIR";
/// Name of the markup artifact the converter writes.
pub const DEFAULT_MARKUP_FILE: &str = "index.html";
/// Name of the stylesheet artifact the converter writes.
pub const DEFAULT_STYLESHEET_FILE: &str = "styles.css";

/// Configuration for a conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use figma2html_web::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .program("node")
///     .args(["index.js"])
///     .timeout_secs(120)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Converter executable, resolved through `PATH`. Default: `node`.
    pub program: String,

    /// Arguments passed to the converter. Default: `["index.js"]`.
    ///
    /// `{output_dir}` and `{file_key}` are substituted per run.
    pub args: Vec<String>,

    /// Working directory for the child process. Default: inherit.
    pub working_dir: Option<PathBuf>,

    /// Environment variable receiving the access token.
    pub token_env: String,

    /// Environment variable receiving the file key.
    pub file_key_env: String,

    /// Environment variable receiving the run's output directory.
    pub output_dir_env: String,

    /// Where each run's artifacts are written. Default: per-run under `./output`.
    pub layout: OutputLayout,

    /// Markup file name. Default: `index.html`.
    pub markup_file: String,

    /// Stylesheet file name. Default: `styles.css`.
    pub stylesheet_file: String,

    /// Upper bound on a single converter run, in seconds. Default: 300.
    ///
    /// The child is killed when the bound is hit.
    pub timeout_secs: u64,

    /// Conversions allowed to run at once. Default: 1.
    pub max_concurrent: usize,

    /// Requests allowed to wait for a free slot before new ones are
    /// rejected as busy. Default: 8.
    pub queue_limit: usize,

    /// Leave per-run directories on disk after reading them. Default: false.
    pub keep_workspaces: bool,

    /// Optional observer for run lifecycle events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            program: "node".to_string(),
            args: vec!["index.js".to_string()],
            working_dir: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            file_key_env: DEFAULT_FILE_KEY_ENV.to_string(),
            output_dir_env: DEFAULT_OUTPUT_DIR_ENV.to_string(),
            layout: OutputLayout::default(),
            markup_file: DEFAULT_MARKUP_FILE.to_string(),
            stylesheet_file: DEFAULT_STYLESHEET_FILE.to_string(),
            timeout_secs: 300,
            max_concurrent: 1,
            queue_limit: 8,
            keep_workspaces: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("working_dir", &self.working_dir)
            .field("token_env", &self.token_env)
            .field("file_key_env", &self.file_key_env)
            .field("output_dir_env", &self.output_dir_env)
            .field("layout", &self.layout)
            .field("markup_file", &self.markup_file)
            .field("stylesheet_file", &self.stylesheet_file)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_concurrent", &self.max_concurrent)
            .field("queue_limit", &self.queue_limit)
            .field("keep_workspaces", &self.keep_workspaces)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.config.program = program.into();
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    pub fn token_env(mut self, name: impl Into<String>) -> Self {
        self.config.token_env = name.into();
        self
    }

    pub fn file_key_env(mut self, name: impl Into<String>) -> Self {
        self.config.file_key_env = name.into();
        self
    }

    pub fn output_dir_env(mut self, name: impl Into<String>) -> Self {
        self.config.output_dir_env = name.into();
        self
    }

    pub fn layout(mut self, layout: OutputLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn markup_file(mut self, name: impl Into<String>) -> Self {
        self.config.markup_file = name.into();
        self
    }

    pub fn stylesheet_file(mut self, name: impl Into<String>) -> Self {
        self.config.stylesheet_file = name.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn max_concurrent(mut self, n: usize) -> Self {
        self.config.max_concurrent = n.max(1);
        self
    }

    pub fn queue_limit(mut self, n: usize) -> Self {
        self.config.queue_limit = n;
        self
    }

    pub fn keep_workspaces(mut self, v: bool) -> Self {
        self.config.keep_workspaces = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.program.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        for name in [&c.markup_file, &c.stylesheet_file] {
            if !is_plain_file_name(name) {
                return Err(ConvertError::InvalidConfig(format!(
                    "Artifact name must be a plain file name, got '{name}'"
                )));
            }
        }
        if c.markup_file == c.stylesheet_file {
            return Err(ConvertError::InvalidConfig(format!(
                "Markup and stylesheet must have different names, both are '{}'",
                c.markup_file
            )));
        }
        for var in [&c.token_env, &c.file_key_env, &c.output_dir_env] {
            if var.is_empty() || var.contains('=') {
                return Err(ConvertError::InvalidConfig(format!(
                    "Invalid environment variable name '{var}'"
                )));
            }
        }
        // One shared directory cannot host two runs.
        if matches!(self.config.layout, OutputLayout::Fixed(_)) {
            self.config.max_concurrent = 1;
        }
        Ok(self.config)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Where the converter deposits its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// A fresh `<root>/<run_id>` directory per run (default).
    PerRun { root: PathBuf },
    /// One shared directory reused by every run.
    ///
    /// For converters that ignore the output-directory variable and always
    /// write to the same place. Runs are serialised in this mode.
    Fixed(PathBuf),
}

impl Default for OutputLayout {
    fn default() -> Self {
        OutputLayout::PerRun {
            root: PathBuf::from("./output"),
        }
    }
}

impl OutputLayout {
    /// The directory a given run reads its artifacts from.
    pub(crate) fn dir_for(&self, run_id: &str) -> PathBuf {
        match self {
            OutputLayout::PerRun { root } => root.join(run_id),
            OutputLayout::Fixed(dir) => dir.clone(),
        }
    }
}
