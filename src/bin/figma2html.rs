//! CLI binary for figma2html-web.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `ServerConfig` and starts the web server.

use anyhow::{Context, Result};
use clap::Parser;
use figma2html_web::{
    serve, ConversionConfig, Converter, OutputLayout, ServerConfig, TracingProgressCallback,
};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address with `node index.js` as the converter
  figma2html

  # Converter lives in another directory
  figma2html --converter-dir ../figma-converter

  # Any executable honouring the contract below
  figma2html --converter ./convert.sh --converter-arg '{file_key}'

  # Legacy converter that always writes to ./output
  figma2html --fixed-output ./output

CONVERTER CONTRACT:
  The converter is started once per submission with:
    FIGMA_ACCESS_TOKEN   the token pasted into the form
    FIGMA_URL            the file key extracted from the pasted URL
    FIGMA_OUTPUT_DIR     directory to write index.html and styles.css into
  It must exit 0 on success. stderr (or stdout) is shown on failure.
  `{output_dir}` and `{file_key}` in --converter-arg values are substituted.

ENVIRONMENT VARIABLES:
  RUST_LOG               Overrides the log filter (e.g. figma2html_web=debug)
"#;

/// Serve a browser front end for a Figma-to-HTML converter.
#[derive(Parser, Debug)]
#[command(
    name = "figma2html",
    version,
    about = "Serve a browser front end for a Figma-to-HTML converter",
    long_about = "Serve a small web page where an operator pastes a Figma access token and a \
design-file URL. Each submission runs the external converter in its own output directory and \
shows the generated HTML and CSS with a live preview and download links.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "FIGMA2HTML_BIND", default_value = "127.0.0.1:8501")]
    bind: SocketAddr,

    /// Converter executable.
    #[arg(long, env = "FIGMA2HTML_CONVERTER", default_value = "node")]
    converter: String,

    /// Argument passed to the converter (repeatable).
    #[arg(
        long = "converter-arg",
        value_name = "ARG",
        default_values_t = vec!["index.js".to_string()],
        allow_hyphen_values = true
    )]
    converter_args: Vec<String>,

    /// Working directory for the converter process.
    #[arg(long, env = "FIGMA2HTML_CONVERTER_DIR")]
    converter_dir: Option<PathBuf>,

    /// Directory under which each run gets its own output directory.
    #[arg(long, env = "FIGMA2HTML_OUTPUT_ROOT", default_value = "./output")]
    output_root: PathBuf,

    /// Use one shared output directory for every run (serialises runs).
    #[arg(long, env = "FIGMA2HTML_FIXED_OUTPUT", conflicts_with = "output_root")]
    fixed_output: Option<PathBuf>,

    /// Converter timeout in seconds.
    #[arg(long, env = "FIGMA2HTML_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Conversions allowed to run at once.
    #[arg(long, env = "FIGMA2HTML_MAX_CONCURRENT", default_value_t = 1)]
    max_concurrent: usize,

    /// Submissions allowed to wait for a slot before new ones get "busy".
    #[arg(long, env = "FIGMA2HTML_QUEUE_LIMIT", default_value_t = 8)]
    queue_limit: usize,

    /// Completed runs kept for preview and download.
    #[arg(long, env = "FIGMA2HTML_HISTORY", default_value_t = 16)]
    history: usize,

    /// Leave per-run output directories on disk.
    #[arg(long, env = "FIGMA2HTML_KEEP_WORKSPACES")]
    keep_workspaces: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FIGMA2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FIGMA2HTML_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    info!(
        "Converter: {} {} ({}s timeout, {} slot(s), {} queued max)",
        config.program,
        config.args.join(" "),
        config.timeout_secs,
        config.max_concurrent,
        config.queue_limit
    );

    let server = ServerConfig {
        bind: cli.bind,
        history: cli.history,
    };

    // ── Serve ────────────────────────────────────────────────────────────
    serve(&server, Converter::new(config))
        .await
        .with_context(|| format!("Server on {} stopped", cli.bind))
}

fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let layout = match cli.fixed_output {
        Some(ref dir) => OutputLayout::Fixed(dir.clone()),
        None => OutputLayout::PerRun {
            root: cli.output_root.clone(),
        },
    };

    let mut builder = ConversionConfig::builder()
        .program(&cli.converter)
        .args(&cli.converter_args)
        .layout(layout)
        .timeout_secs(cli.timeout)
        .max_concurrent(cli.max_concurrent)
        .queue_limit(cli.queue_limit)
        .keep_workspaces(cli.keep_workspaces)
        .progress_callback(Arc::new(TracingProgressCallback));

    if let Some(ref dir) = cli.converter_dir {
        builder = builder.working_dir(dir);
    }

    builder.build().context("Invalid converter configuration")
}
