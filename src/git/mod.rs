//! Resolution of the git context that accompanies a submission. Each CI
//! environment exposes a different amount of it: some the whole head commit
//! and branch, some only a commit id.

mod appveyor;
mod command_line;
mod github;
mod teamcity;

pub use appveyor::AppVeyorGitDataResolver;
pub use command_line::{CommandLineGitDataResolver, GitOverrides};
pub use github::GitHubActionsGitDataResolver;
pub use teamcity::TeamCityGitDataResolver;

use crate::model::GitInfo;
use crate::ports::EnvironmentVariables;

pub trait GitDataResolver {
    /// Whether this resolver's environment was detected.
    fn can_provide_data(&self) -> bool;

    /// `None` when the environment is detected but lacks the required values.
    fn generate_data(&self) -> Option<GitInfo>;

    fn display_name(&self) -> &'static str;
}

/// The standard chain, in priority order: explicit overrides first, then
/// AppVeyor, TeamCity and GitHub Actions.
pub fn default_resolvers<'a>(
    overrides: &'a GitOverrides,
    env: &'a dyn EnvironmentVariables,
) -> Vec<Box<dyn GitDataResolver + 'a>> {
    vec![
        Box::new(CommandLineGitDataResolver::new(overrides)),
        Box::new(AppVeyorGitDataResolver::new(env)),
        Box::new(TeamCityGitDataResolver::new(env)),
        Box::new(GitHubActionsGitDataResolver::new(env)),
    ]
}

/// First usable result from a resolver that can provide data. A detected
/// resolver with nothing to offer does not stop the search.
pub fn resolve_git_data(resolvers: &[Box<dyn GitDataResolver + '_>]) -> Option<GitInfo> {
    for resolver in resolvers.iter().filter(|r| r.can_provide_data()) {
        match resolver.generate_data() {
            Some(info) => {
                tracing::debug!(resolver = resolver.display_name(), "resolved git data");
                return Some(info);
            }
            None => tracing::debug!(
                resolver = resolver.display_name(),
                "resolver detected but produced no git data"
            ),
        }
    }
    tracing::info!("no git data available");
    None
}
