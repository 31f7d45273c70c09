//! Result types produced by a conversion run.

use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};

/// One of the two files the converter is expected to write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// File name inside the output directory, e.g. `index.html`.
    pub file_name: String,
    /// File content, decoded as UTF-8 with invalid sequences dropped.
    /// Empty when the file was missing or unreadable.
    pub content: String,
    /// Set when the file existed but could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ArtifactError>,
}

impl Artifact {
    /// An artifact whose file was not present.
    pub fn missing(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// An artifact with content, e.g. from an in-memory provider.
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A file found in the run's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Everything a provider hands back for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderOutput {
    pub markup: Artifact,
    pub stylesheet: Artifact,
    /// Listing of the output directory taken right after the run.
    pub files: Vec<OutputFile>,
    /// Converter stdout followed by stderr.
    pub log: String,
    pub exit_code: Option<i32>,
    /// Display path of the directory the artifacts came from.
    pub output_dir: String,
}

/// Timing and size figures for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of `<div` occurrences in the markup. Display only.
    pub element_count: usize,
    pub provider_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The complete result of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub run_id: String,
    pub file_key: String,
    pub markup: Artifact,
    pub stylesheet: Artifact,
    pub files: Vec<OutputFile>,
    pub log: String,
    pub exit_code: Option<i32>,
    pub output_dir: String,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Errors recorded while reading individual artifacts.
    pub fn artifact_errors(&self) -> impl Iterator<Item = &ArtifactError> {
        self.markup
            .error
            .iter()
            .chain(self.stylesheet.error.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_is_empty() {
        let a = Artifact::missing("styles.css");
        assert!(a.is_empty());
        assert_eq!(a.file_name, "styles.css");
        assert!(a.error.is_none());
    }

    #[test]
    fn artifact_errors_iterates_both() {
        let markup = Artifact::new("index.html", "<div>");
        let stylesheet = Artifact {
            file_name: "styles.css".into(),
            content: String::new(),
            error: Some(ArtifactError::ReadFailed {
                file: "styles.css".into(),
                detail: "denied".into(),
            }),
        };
        let out = ConversionOutput {
            run_id: "r".into(),
            file_key: "K".into(),
            markup,
            stylesheet,
            files: vec![],
            log: String::new(),
            exit_code: Some(0),
            output_dir: "out/r".into(),
            stats: ConversionStats::default(),
        };
        assert_eq!(out.artifact_errors().count(), 1);
    }
}
