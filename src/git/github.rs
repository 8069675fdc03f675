use super::GitDataResolver;
use crate::metadata::non_blank;
use crate::model::{CommitSha, GitInfo};
use crate::ports::EnvironmentVariables;

pub struct GitHubActionsGitDataResolver<'a> {
    env: &'a dyn EnvironmentVariables,
}

impl<'a> GitHubActionsGitDataResolver<'a> {
    pub fn new(env: &'a dyn EnvironmentVariables) -> Self {
        Self { env }
    }
}

impl GitDataResolver for GitHubActionsGitDataResolver<'_> {
    fn can_provide_data(&self) -> bool {
        self.env.get_boolean_variable("GITHUB_ACTIONS")
    }

    fn generate_data(&self) -> Option<GitInfo> {
        non_blank(self.env, "GITHUB_SHA").map(|sha| GitInfo::CommitSha(CommitSha(sha)))
    }

    fn display_name(&self) -> &'static str {
        "GitHub Actions"
    }
}
