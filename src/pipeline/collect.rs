//! Result collection: read the two artifacts back from the output directory.
//!
//! A missing file is not an error here; it simply yields empty content and
//! the orchestrator decides whether an all-empty result is a failure. A file
//! that exists but cannot be read degrades to empty content with an
//! [`ArtifactError`] attached, and the other file is still read.

use crate::error::ArtifactError;
use crate::output::{Artifact, OutputFile};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Read one artifact from `dir`.
pub async fn read_artifact(dir: &Path, file_name: &str) -> Artifact {
    let path = dir.join(file_name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read {} ({} bytes)", path.display(), bytes.len());
            Artifact::new(file_name, decode_ignoring_invalid(&bytes))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Artifact {} not present", path.display());
            Artifact::missing(file_name)
        }
        Err(e) => {
            warn!("Error reading generated file {}: {}", path.display(), e);
            Artifact {
                file_name: file_name.to_string(),
                content: String::new(),
                error: Some(ArtifactError::ReadFailed {
                    file: file_name.to_string(),
                    detail: e.to_string(),
                }),
            }
        }
    }
}

/// Read the markup and stylesheet artifacts.
pub async fn read_artifacts(
    dir: &Path,
    markup_file: &str,
    stylesheet_file: &str,
) -> (Artifact, Artifact) {
    let markup = read_artifact(dir, markup_file).await;
    let stylesheet = read_artifact(dir, stylesheet_file).await;
    (markup, stylesheet)
}

/// List every regular file in `dir` with its size, sorted by name.
///
/// Subdirectories are skipped. A missing or unreadable directory yields an
/// empty listing.
pub async fn list_files(dir: &Path) -> Vec<OutputFile> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) => {
            debug!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => match entry.metadata().await {
                Ok(meta) if meta.is_file() => files.push(OutputFile {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    size: meta.len(),
                }),
                Ok(_) => {}
                Err(e) => warn!("Cannot stat {}: {}", entry.path().display(), e),
            },
            Ok(None) => break,
            Err(e) => {
                warn!("Error listing {}: {}", dir.display(), e);
                break;
            }
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}
