//! Conversion providers: whatever turns a file key into markup + stylesheet.
//!
//! The orchestrator in [`crate::convert`] only sees the
//! [`ConversionProvider`] trait, so the external program can be replaced by an
//! in-process library, a remote service or a test double without touching it.
//! [`CommandProvider`] is the production implementation and drives an
//! external executable through the pipeline stages.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::ProviderOutput;
use crate::pipeline::{collect, invoke, workspace::Workspace};
use crate::request::AccessToken;
use async_trait::async_trait;
use tracing::debug;

/// A capability that converts one design file.
///
/// Implementations return both artifacts (empty when not produced) or a typed
/// failure. Deciding that an all-empty result is an error is left to the
/// caller.
#[async_trait]
pub trait ConversionProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Convert the design identified by `file_key`.
    ///
    /// `run_id` is unique per call and may be used to namespace any state the
    /// provider keeps.
    async fn convert(
        &self,
        run_id: &str,
        token: &AccessToken,
        file_key: &str,
    ) -> Result<ProviderOutput, ConvertError>;
}

/// Runs an external converter executable.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    config: ConversionConfig,
}

impl CommandProvider {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

#[async_trait]
impl ConversionProvider for CommandProvider {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn convert(
        &self,
        run_id: &str,
        token: &AccessToken,
        file_key: &str,
    ) -> Result<ProviderOutput, ConvertError> {
        let c = &self.config;
        let workspace = Workspace::create(
            &c.layout,
            run_id,
            &[c.markup_file.as_str(), c.stylesheet_file.as_str()],
            c.keep_workspaces,
        )
        .await?;

        let run = invoke::run_converter(c, token, file_key, workspace.path()).await?;

        let (markup, stylesheet) =
            collect::read_artifacts(workspace.path(), &c.markup_file, &c.stylesheet_file).await;
        let files = collect::list_files(workspace.path()).await;
        debug!(
            "Run {} produced {} file(s) in {}",
            workspace.run_id(),
            files.len(),
            workspace.path().display()
        );

        let output_dir = workspace.path().display().to_string();
        workspace.cleanup().await;

        Ok(ProviderOutput {
            markup,
            stylesheet,
            files,
            log: run.combined(),
            exit_code: run.exit_code,
            output_dir,
        })
    }
}
