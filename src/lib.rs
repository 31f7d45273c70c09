//! # figma2html-web
//!
//! A browser front end for an external Figma-to-HTML converter.
//!
//! The operator pastes a personal access token and a design-file URL; the
//! server extracts the file key, runs the converter as a child process, reads
//! back the `index.html` and `styles.css` it wrote, and shows them in a
//! tabbed view with a live preview and download links. The conversion itself
//! is entirely the external program's business.
//!
//! ## Pipeline Overview
//!
//! ```text
//! form (token, URL)
//!  │
//!  ├─ 1. Validate  token present, URL present, file key extractable
//!  ├─ 2. Admit     wait for a conversion slot (bounded queue)
//!  ├─ 3. Provider  per-run directory → child process → read artifacts back
//!  ├─ 4. Check     at least one artifact has content
//!  ├─ 5. Stats     `<div` count, display only
//!  └─ 6. Render    preview / HTML / CSS / files / download tabs
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use figma2html_web::{ConversionConfig, ConversionRequest, Converter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .program("node")
//!         .args(["index.js"])
//!         .build()?;
//!     let converter = Converter::new(config);
//!     let request = ConversionRequest::new(
//!         "figd_xxx",
//!         "https://figma.com/design/ABC123/Project-Name",
//!     );
//!     let output = converter.convert(&request).await?;
//!     println!("{} elements", output.stats.element_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Converter contract
//!
//! | Variable | Content |
//! |----------|---------|
//! | `FIGMA_ACCESS_TOKEN` | the operator's token |
//! | `FIGMA_URL` | the extracted file key |
//! | `FIGMA_OUTPUT_DIR` | directory to write `index.html` and `styles.css` into |
//!
//! Any executable that honours this contract and exits 0 on success can be
//! plugged in. Implement [`ConversionProvider`] to replace the process
//! altogether.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `figma2html` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod request;
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, OutputLayout};
pub use convert::{validate, Converter};
pub use error::{ArtifactError, ConvertError, ErrorKind};
pub use output::{Artifact, ConversionOutput, ConversionStats, OutputFile, ProviderOutput};
pub use pipeline::file_key::extract_file_key;
pub use pipeline::preview::build_preview;
pub use pipeline::stats::count_elements;
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, ProgressCallback, TracingProgressCallback,
};
pub use provider::{CommandProvider, ConversionProvider};
pub use request::{AccessToken, ConversionRequest};
pub use web::{router, serve, AppState, ServerConfig};
