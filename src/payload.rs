//! The JSON document submitted to Coveralls. Only serialization lives here;
//! sending it is left to the caller.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::model::{CommitSha, CoverageFile, CoverageMetadata, GitData, GitInfo};

#[derive(Debug, Clone, Serialize)]
pub struct CoverallsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_token: Option<String>,
    pub service_name: String,
    pub service_job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_pull_request: Option<String>,
    pub parallel: bool,
    #[serde(serialize_with = "rfc3339")]
    pub run_at: DateTime<Utc>,
    pub source_files: Vec<CoverageFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<CommitSha>,
}

impl CoverallsPayload {
    pub fn new(
        source_files: Vec<CoverageFile>,
        metadata: CoverageMetadata,
        git: Option<GitInfo>,
        run_at: DateTime<Utc>,
    ) -> Self {
        let (git, commit_sha) = match git {
            Some(GitInfo::Full(data)) => (Some(data), None),
            Some(GitInfo::CommitSha(sha)) => (None, Some(sha)),
            None => (None, None),
        };

        Self {
            repo_token: None,
            service_name: metadata.service_name,
            service_job_id: metadata.service_job_id,
            service_number: metadata.service_number,
            service_pull_request: metadata.pull_request_id,
            parallel: metadata.parallel,
            run_at,
            source_files,
            git,
            commit_sha,
        }
    }

    pub fn with_repo_token(mut self, token: Option<String>) -> Self {
        self.repo_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn rfc3339<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
}
