//! Error types for the figma2html-web library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] is **fatal**: the run cannot produce a result at all
//!   (missing input, converter exited nonzero, nothing was written). Returned
//!   as `Err(ConvertError)` from [`crate::convert::Converter::convert`].
//!
//! * [`ArtifactError`] is **non-fatal**: one of the two output files could not
//!   be read back. Stored on the [`crate::output::Artifact`] so the other file
//!   is still shown and the operator sees which one degraded.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by a conversion run.
///
/// Artifact-level read failures use [`ArtifactError`] and are stored in
/// [`crate::output::Artifact`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No access token was supplied.
    #[error("Please provide a Figma access token")]
    MissingCredential,

    /// No design-file URL was supplied.
    #[error("Please provide a Figma file URL")]
    MissingUrl,

    /// The URL does not contain a recognisable file key.
    #[error("Invalid Figma URL '{url}'\nExpected something like https://figma.com/design/ABC123/Project-Name")]
    InvalidUrl { url: String },

    // ── Converter errors ──────────────────────────────────────────────────
    /// The converter executable could not be started.
    #[error("Failed to start converter '{program}': {source}")]
    ProviderSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran and exited with a failure status.
    #[error("Converter failed{}: {detail}", exit_suffix(.exit_code))]
    ProviderFailed {
        exit_code: Option<i32>,
        detail: String,
    },

    /// The converter did not finish within the configured bound.
    #[error("Converter timed out after {secs}s and was stopped")]
    ProviderTimeout { secs: u64 },

    /// The converter reported success but neither artifact has content.
    #[error("No files were generated in '{dir}'. Check that the converter ran successfully.")]
    NoFilesGenerated { dir: PathBuf },

    // ── Resource errors ───────────────────────────────────────────────────
    /// Could not create, inspect or remove the run's output directory.
    #[error("Output directory '{path}' is unusable: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Too many conversions are already running or queued.
    #[error("Converter is busy ({limit} requests already waiting). Try again shortly.")]
    Busy { limit: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used by callers that map errors onto a transport
/// (HTTP status codes, exit codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operator input was missing or malformed; nothing was attempted.
    Input,
    /// The converter failed, timed out, or produced nothing.
    Provider,
    /// A timeout specifically.
    Timeout,
    /// The queue was full.
    Busy,
    /// Filesystem, configuration or internal failure.
    Internal,
}

impl ConvertError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MissingCredential
            | ConvertError::MissingUrl
            | ConvertError::InvalidUrl { .. } => ErrorKind::Input,
            ConvertError::ProviderSpawn { .. }
            | ConvertError::ProviderFailed { .. }
            | ConvertError::NoFilesGenerated { .. } => ErrorKind::Provider,
            ConvertError::ProviderTimeout { .. } => ErrorKind::Timeout,
            ConvertError::Busy { .. } => ErrorKind::Busy,
            ConvertError::Workspace { .. }
            | ConvertError::InvalidConfig(_)
            | ConvertError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True when the run was rejected before anything was launched.
    pub fn is_input_error(&self) -> bool {
        self.kind() == ErrorKind::Input
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}"))
        .unwrap_or_default()
}

/// A non-fatal error for a single output file.
///
/// The artifact it belongs to degrades to empty content; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ArtifactError {
    /// The file exists but could not be read.
    #[error("Error reading generated file '{file}': {detail}")]
    ReadFailed { file: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failed_display_with_code() {
        let e = ConvertError::ProviderFailed {
            exit_code: Some(2),
            detail: "Conversion failed: 403 Forbidden".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("exit code 2"), "got: {msg}");
        assert!(msg.contains("403 Forbidden"), "got: {msg}");
    }

    #[test]
    fn provider_failed_display_without_code() {
        let e = ConvertError::ProviderFailed {
            exit_code: None,
            detail: "killed by signal".into(),
        };
        let msg = e.to_string();
        assert!(!msg.contains("exit code"), "got: {msg}");
        assert!(msg.starts_with("Converter failed: killed"), "got: {msg}");
    }

    #[test]
    fn no_files_display_names_directory() {
        let e = ConvertError::NoFilesGenerated {
            dir: PathBuf::from("output/run-1"),
        };
        assert!(e.to_string().contains("output/run-1"));
    }

    #[test]
    fn invalid_url_is_input_error() {
        let e = ConvertError::InvalidUrl {
            url: "https://example.com/foo".into(),
        };
        assert!(e.is_input_error());
        assert!(e.to_string().contains("example.com/foo"));
    }

    #[test]
    fn kinds_are_classified() {
        assert_eq!(ConvertError::MissingUrl.kind(), ErrorKind::Input);
        assert_eq!(
            ConvertError::ProviderTimeout { secs: 5 }.kind(),
            ErrorKind::Timeout
        );
        assert_eq!(ConvertError::Busy { limit: 8 }.kind(), ErrorKind::Busy);
        assert_eq!(
            ConvertError::Internal("x".into()).kind(),
            ErrorKind::Internal
        );
        assert!(!ConvertError::Busy { limit: 1 }.is_input_error());
    }

    #[test]
    fn artifact_error_display() {
        let e = ArtifactError::ReadFailed {
            file: "styles.css".into(),
            detail: "permission denied".into(),
        };
        assert!(e.to_string().contains("styles.css"));
        assert!(e.to_string().contains("permission denied"));
    }
}
