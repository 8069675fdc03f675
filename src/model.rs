//! Canonical in-memory representation of coverage and CI context,
//! independent of any report dialect. Parsers produce `FileCoverageData`,
//! which the builder turns into immutable `CoverageFile` records.

use serde::Serialize;

/// Hit count for one source line; `None` marks a non-executable line.
pub type LineHits = Option<i64>;

/// Per-file parse result, before source reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverageData {
    pub full_path: String,
    pub coverage: Vec<LineHits>,
    /// Source lines when the report itself carries them.
    pub source: Option<Vec<String>>,
}

impl FileCoverageData {
    pub fn new(full_path: impl Into<String>, coverage: Vec<LineHits>) -> Self {
        Self {
            full_path: full_path.into(),
            coverage,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Vec<String>) -> Self {
        self.source = Some(source);
        self
    }
}

/// A source file ready for submission.
///
/// `coverage.len()` always equals the number of source lines used for the
/// digest, unless the report covered more lines than the source has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageFile {
    #[serde(rename = "name")]
    path: String,
    source_digest: String,
    coverage: Vec<LineHits>,
}

impl CoverageFile {
    pub(crate) fn new(path: String, source_digest: String, coverage: Vec<LineHits>) -> Self {
        Self {
            path,
            source_digest,
            coverage,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source_digest(&self) -> &str {
        &self.source_digest
    }

    pub fn coverage(&self) -> &[LineHits] {
        &self.coverage
    }
}

/// Service and build identifiers that accompany a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMetadata {
    pub service_name: String,
    pub service_job_id: String,
    pub service_number: Option<String>,
    pub pull_request_id: Option<String>,
    pub parallel: bool,
}

/// The head commit of a [`GitData`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GitHead {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
    pub message: String,
}

/// Full git context for a build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GitData {
    pub head: GitHead,
    pub branch: String,
    /// Nearest tag, when the build was triggered by one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A bare commit identifier, for CI environments that expose nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommitSha(pub String);

/// The outcome of git resolution: full context or only a commit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitInfo {
    Full(GitData),
    CommitSha(CommitSha),
}

impl GitInfo {
    pub fn git_data(&self) -> Option<&GitData> {
        match self {
            GitInfo::Full(data) => Some(data),
            GitInfo::CommitSha(_) => None,
        }
    }

    pub fn commit_sha(&self) -> Option<&CommitSha> {
        match self {
            GitInfo::Full(_) => None,
            GitInfo::CommitSha(sha) => Some(sha),
        }
    }
}
