use super::{non_blank, MetadataResolver};
use crate::ports::EnvironmentVariables;

/// Travis sets `TRAVIS_PULL_REQUEST` to the literal `false` on non-PR builds.
const NOT_A_PULL_REQUEST: &str = "false";

pub struct TravisMetadataResolver<'a> {
    env: &'a dyn EnvironmentVariables,
}

impl<'a> TravisMetadataResolver<'a> {
    pub fn new(env: &'a dyn EnvironmentVariables) -> Self {
        Self { env }
    }
}

impl MetadataResolver for TravisMetadataResolver<'_> {
    fn is_active(&self) -> bool {
        self.env.get_boolean_variable("TRAVIS")
    }

    fn resolve_service_name(&self) -> Option<String> {
        Some("travis".to_string())
    }

    fn resolve_service_job_id(&self) -> Option<String> {
        non_blank(self.env, "TRAVIS_JOB_ID")
    }

    fn resolve_service_build_number(&self) -> Option<String> {
        non_blank(self.env, "TRAVIS_BUILD_NUMBER")
    }

    fn resolve_pull_request_id(&self) -> Option<String> {
        non_blank(self.env, "TRAVIS_PULL_REQUEST").filter(|v| v != NOT_A_PULL_REQUEST)
    }
}
