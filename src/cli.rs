//! Command handler for the covsubmit CLI.
//!
//! `cmd_submit` returns the payload as a `String` and takes its ports as
//! arguments, so it can be tested without touching the process environment
//! or the disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use crate::git::{self, GitOverrides};
use crate::loader::CoverageLoader;
use crate::metadata::{self, MetadataOverrides};
use crate::path::PathProcessor;
use crate::payload::CoverallsPayload;
use crate::ports::{EnvironmentVariables, FileSystem};

pub const REPO_TOKEN_VARIABLE: &str = "COVERALLS_REPO_TOKEN";

/// Everything `cmd_submit` needs besides its ports.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub mode: String,
    pub input: PathBuf,
    pub use_relative_paths: bool,
    pub base_path: PathBuf,
    pub repo_token: Option<String>,
    pub parallel: bool,
    pub metadata: MetadataOverrides,
    pub git: GitOverrides,
}

/// Load the coverage report, resolve metadata and git context, and render
/// the submission payload as JSON.
pub fn cmd_submit(
    options: &SubmitOptions,
    files: &dyn FileSystem,
    env: &dyn EnvironmentVariables,
    run_at: DateTime<Utc>,
) -> Result<String> {
    let path_processor = PathProcessor::new(&options.base_path);
    let source_files = CoverageLoader::new(files)
        .load_coverage_files_by_name(
            &options.mode,
            &path_processor,
            &options.input,
            options.use_relative_paths,
        )
        .with_context(|| format!("Failed to load coverage from {}", options.input.display()))?;

    let metadata = metadata::resolve_metadata(
        &metadata::default_resolvers(&options.metadata, env),
        options.parallel,
    );
    let git = git::resolve_git_data(&git::default_resolvers(&options.git, env));

    let repo_token = options
        .repo_token
        .clone()
        .or_else(|| env.get_environment_variable(REPO_TOKEN_VARIABLE));
    if repo_token.is_none() {
        tracing::warn!("no repo token given; the payload will not authenticate on its own");
    }

    let payload =
        CoverallsPayload::new(source_files, metadata, git, run_at).with_repo_token(repo_token);
    tracing::info!(
        files = payload.source_files.len(),
        service = %payload.service_name,
        job = %payload.service_job_id,
        "payload ready"
    );
    payload.to_json().context("Failed to serialize payload")
}

/// Write `text` to `output` through the file port.
pub fn cmd_write(files: &dyn FileSystem, output: &Path, text: &str) -> Result<String> {
    if !files.write_file(output, text) {
        bail!("Failed to write payload to {}", output.display());
    }
    Ok(format!("Wrote payload to {}\n", output.display()))
}
