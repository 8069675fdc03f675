use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use covsubmit::cli::{self, SubmitOptions};
use covsubmit::git::GitOverrides;
use covsubmit::metadata::MetadataOverrides;
use covsubmit::ports::{LocalFileSystem, ProcessEnvironment};

/// covsubmit: normalize a coverage report into a Coveralls payload.
#[derive(Parser)]
#[command(name = "covsubmit", version, about)]
struct Cli {
    /// Coverage format of the input: lcov, opencover, ncover, monocov,
    /// reportgenerator, chutzpah, dynamiccodecoverage or exportcodecoverage.
    #[arg(long)]
    mode: String,

    /// Report file, or report directory for monocov and reportgenerator.
    #[arg(long)]
    input: PathBuf,

    /// Report paths relative to --base-path instead of as given.
    #[arg(long)]
    use_relative_paths: bool,

    /// Root that relative paths are computed against (default: current directory).
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Write the payload here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Coveralls repo token (default: $COVERALLS_REPO_TOKEN).
    #[arg(long)]
    repo_token: Option<String>,

    /// Mark this job as one of several parallel jobs.
    #[arg(long)]
    parallel: bool,

    #[arg(long)]
    service_name: Option<String>,

    #[arg(long)]
    job_id: Option<String>,

    #[arg(long)]
    build_number: Option<String>,

    #[arg(long)]
    pull_request: Option<String>,

    #[arg(long)]
    commit_id: Option<String>,

    #[arg(long)]
    commit_branch: Option<String>,

    #[arg(long)]
    commit_author: Option<String>,

    #[arg(long)]
    commit_email: Option<String>,

    #[arg(long)]
    commit_message: Option<String>,

    /// Log filter, e.g. "debug" or "covsubmit=trace". RUST_LOG takes precedence.
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let base_path = match cli.base_path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let options = SubmitOptions {
        mode: cli.mode,
        input: cli.input,
        use_relative_paths: cli.use_relative_paths,
        base_path,
        repo_token: cli.repo_token,
        parallel: cli.parallel,
        metadata: MetadataOverrides {
            service_name: cli.service_name,
            job_id: cli.job_id,
            build_number: cli.build_number,
            pull_request_id: cli.pull_request,
        },
        git: GitOverrides {
            commit_id: cli.commit_id,
            branch: cli.commit_branch,
            author: cli.commit_author,
            email: cli.commit_email,
            message: cli.commit_message,
        },
    };

    let files = LocalFileSystem;
    let payload = cli::cmd_submit(&options, &files, &ProcessEnvironment, chrono::Utc::now())?;

    match cli.output {
        Some(output) => eprint!("{}", cli::cmd_write(&files, &output, &payload)?),
        None => println!("{payload}"),
    }
    Ok(())
}
