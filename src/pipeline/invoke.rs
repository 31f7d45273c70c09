//! Converter invocation: run the external program for one file key.
//!
//! ## Contract with the converter
//!
//! The child receives the access token, the file key and the run's output
//! directory through three environment variables (names configurable, see
//! [`crate::config::ConversionConfig`]). It is expected to write the markup
//! and stylesheet files into that directory and exit 0. Anything else it
//! prints is captured and shown to the operator.
//!
//! ## Cancellation
//!
//! The child is spawned with `kill_on_drop`, so dropping the future returned
//! by [`run_converter`] (client went away, timeout hit) kills the process.
//!
//! Only the direct child is killed. A converter started through a wrapper
//! (`sh -c`, `npm run`) can leave grandchildren running after a timeout, and
//! they may still write into a directory that has already been removed.
//! Configure the real converter as the program (`node index.js`, not
//! `npm run convert`) so the kill reaches it.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::pipeline::collect::decode_ignoring_invalid;
use crate::request::AccessToken;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a converter process that exited successfully.
#[derive(Debug, Clone, Default)]
pub struct ConverterRun {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub elapsed_ms: u64,
}

impl ConverterRun {
    /// Stdout followed by stderr, separated by a newline when both are present.
    pub fn combined(&self) -> String {
        combine_output(&self.stdout, &self.stderr)
    }
}

fn combine_output(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) if stdout.ends_with('\n') => format!("{stdout}{stderr}"),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

/// Substitute `{output_dir}` and `{file_key}` in a configured argument.
pub fn expand_arg(arg: &str, output_dir: &Path, file_key: &str) -> String {
    arg.replace("{output_dir}", &output_dir.display().to_string())
        .replace("{file_key}", file_key)
}

/// Launch the converter and wait for it to finish.
///
/// # Errors
/// * [`ConvertError::Workspace`]: `output_dir` could not be created
/// * [`ConvertError::ProviderSpawn`]: the program could not be started
/// * [`ConvertError::ProviderTimeout`]: `timeout_secs` elapsed; the child was killed
/// * [`ConvertError::ProviderFailed`]: nonzero exit or termination by signal,
///   carrying the child's stderr (stdout when stderr is empty) verbatim
pub async fn run_converter(
    config: &ConversionConfig,
    token: &AccessToken,
    file_key: &str,
    output_dir: &Path,
) -> Result<ConverterRun, ConvertError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| ConvertError::Workspace {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let args: Vec<String> = config
        .args
        .iter()
        .map(|a| expand_arg(a, output_dir, file_key))
        .collect();

    let mut cmd = Command::new(&config.program);
    cmd.args(&args)
        .env(&config.token_env, token.expose())
        .env(&config.file_key_env, file_key)
        .env(&config.output_dir_env, output_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(ref dir) = config.working_dir {
        cmd.current_dir(dir);
    }

    debug!(
        "Spawning converter: {} {:?} (output: {})",
        config.program,
        args,
        output_dir.display()
    );

    let start = Instant::now();
    let child = cmd.spawn().map_err(|e| ConvertError::ProviderSpawn {
        program: config.program.clone(),
        source: e,
    })?;

    let output = match tokio::time::timeout(
        Duration::from_secs(config.timeout_secs),
        child.wait_with_output(),
    )
    .await
    {
        Ok(result) => result.map_err(|e| {
            ConvertError::Internal(format!("Failed to collect converter output: {e}"))
        })?,
        Err(_) => {
            warn!("Converter exceeded {}s, killing it", config.timeout_secs);
            return Err(ConvertError::ProviderTimeout {
                secs: config.timeout_secs,
            });
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let stdout = decode_ignoring_invalid(&output.stdout);
    let stderr = decode_ignoring_invalid(&output.stderr);
    let exit_code = output.status.code();

    debug!(
        "Converter exited with {:?} after {}ms\n{}",
        exit_code,
        elapsed_ms,
        combine_output(&stdout, &stderr)
    );

    if !output.status.success() {
        let detail = if !stderr.trim().is_empty() {
            stderr
        } else if !stdout.trim().is_empty() {
            stdout
        } else {
            "Unknown error".to_string()
        };
        return Err(ConvertError::ProviderFailed { exit_code, detail });
    }

    Ok(ConverterRun {
        stdout,
        stderr,
        exit_code,
        elapsed_ms,
    })
}
