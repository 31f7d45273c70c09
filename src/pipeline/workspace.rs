//! Per-run output directories.
//!
//! Each run gets `<root>/<run_id>`, created exclusively so two runs can never
//! share a directory. The directory is removed by [`Workspace::cleanup`] once
//! the artifacts are read, or on drop if the run was cancelled first, unless
//! the caller asked to keep it. In the fixed layout the shared directory is
//! reused and never removed, but the two artifacts are deleted up front so a
//! failed run cannot surface the previous run's files.
//!
//! Workspace paths are always absolute. The converter may run with its own
//! working directory, so a relative path would point it somewhere else.

use crate::config::OutputLayout;
use crate::error::ConvertError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a run id: `run-<millis hex>-<counter hex>`.
///
/// Unique within a process; the millisecond prefix keeps ids from different
/// process lifetimes apart and makes directory listings sort by start time.
pub fn new_run_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let n = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("run-{millis:011x}-{n:04x}")
}

/// Resolve `path` against the current directory without touching the disk.
fn absolute(path: &Path) -> Result<PathBuf, ConvertError> {
    std::path::absolute(path).map_err(|e| ConvertError::Workspace {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The directory a single run writes into.
#[derive(Debug)]
pub struct Workspace {
    run_id: String,
    dir: PathBuf,
    remove_on_drop: bool,
}

impl Workspace {
    /// Prepare the output directory for `run_id`.
    ///
    /// # Errors
    /// [`ConvertError::Workspace`] when the directory cannot be created, when
    /// a per-run directory with that id already exists, or when a stale
    /// artifact cannot be removed from a fixed directory.
    pub async fn create(
        layout: &OutputLayout,
        run_id: &str,
        artifact_names: &[&str],
        keep: bool,
    ) -> Result<Self, ConvertError> {
        let dir = absolute(&layout.dir_for(run_id))?;
        match layout {
            OutputLayout::PerRun { .. } => Self::create_per_run(dir, run_id, keep).await,
            OutputLayout::Fixed(_) => Self::prepare_fixed(dir, run_id, artifact_names).await,
        }
    }

    async fn create_per_run(dir: PathBuf, run_id: &str, keep: bool) -> Result<Self, ConvertError> {
        if let Some(root) = dir.parent() {
            tokio::fs::create_dir_all(root)
                .await
                .map_err(|e| ConvertError::Workspace {
                    path: root.to_path_buf(),
                    source: e,
                })?;
        }
        // Exclusive: an existing directory means another run owns it.
        if let Err(e) = tokio::fs::create_dir(&dir).await {
            return Err(ConvertError::Workspace { path: dir, source: e });
        }
        debug!("Created workspace {}", dir.display());
        Ok(Self {
            run_id: run_id.to_string(),
            dir,
            remove_on_drop: !keep,
        })
    }

    async fn prepare_fixed(
        dir: PathBuf,
        run_id: &str,
        artifact_names: &[&str],
    ) -> Result<Self, ConvertError> {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ConvertError::Workspace {
                path: dir.clone(),
                source: e,
            })?;
        for name in artifact_names {
            let stale = dir.join(name);
            match tokio::fs::remove_file(&stale).await {
                Ok(()) => debug!("Removed stale artifact {}", stale.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(ConvertError::Workspace { path: stale, source: e }),
            }
        }
        Ok(Self {
            run_id: run_id.to_string(),
            dir,
            remove_on_drop: false,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Absolute path of the directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Remove the directory now, unless it is kept.
    ///
    /// Failures are logged; the run's result is already in memory.
    pub async fn cleanup(mut self) {
        if !self.remove_on_drop {
            return;
        }
        self.remove_on_drop = false;
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => debug!("Removed workspace {}", self.dir.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove workspace {}: {}", self.dir.display(), e),
        }
    }
}

/// Fallback for runs dropped before [`Workspace::cleanup`], e.g. on timeout
/// or client disconnect.
impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.remove_on_drop {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove workspace {}: {}", self.dir.display(), e);
            }
        } else {
            debug!("Removed workspace {}", self.dir.display());
        }
    }
}
