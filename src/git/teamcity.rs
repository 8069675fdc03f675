use super::GitDataResolver;
use crate::metadata::non_blank;
use crate::model::{CommitSha, GitInfo};
use crate::ports::EnvironmentVariables;

/// TeamCity only exposes the revision being built.
pub struct TeamCityGitDataResolver<'a> {
    env: &'a dyn EnvironmentVariables,
}

impl<'a> TeamCityGitDataResolver<'a> {
    pub fn new(env: &'a dyn EnvironmentVariables) -> Self {
        Self { env }
    }
}

impl GitDataResolver for TeamCityGitDataResolver<'_> {
    fn can_provide_data(&self) -> bool {
        non_blank(self.env, "TEAMCITY_VERSION").is_some()
    }

    fn generate_data(&self) -> Option<GitInfo> {
        non_blank(self.env, "BUILD_VCS_NUMBER").map(|sha| GitInfo::CommitSha(CommitSha(sha)))
    }

    fn display_name(&self) -> &'static str {
        "TeamCity"
    }
}
