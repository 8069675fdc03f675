//! Resolution of service name, job id, build number and pull request id from
//! an ordered list of CI-specific resolvers.

mod appveyor;
mod command_line;
mod github;
mod travis;

pub use appveyor::AppVeyorMetadataResolver;
pub use command_line::{CommandLineMetadataResolver, MetadataOverrides};
pub use github::GitHubActionsMetadataResolver;
pub use travis::TravisMetadataResolver;

use crate::model::CoverageMetadata;
use crate::ports::EnvironmentVariables;

pub const DEFAULT_SERVICE_NAME: &str = "coveralls.net";
pub const DEFAULT_SERVICE_JOB_ID: &str = "0";

/// One source of build metadata. Every field is resolved independently.
pub trait MetadataResolver {
    fn is_active(&self) -> bool;

    fn resolve_service_name(&self) -> Option<String>;

    fn resolve_service_job_id(&self) -> Option<String>;

    fn resolve_service_build_number(&self) -> Option<String>;

    fn resolve_pull_request_id(&self) -> Option<String>;
}

/// The standard chain, in priority order: explicit overrides first, then
/// AppVeyor, Travis and GitHub Actions.
pub fn default_resolvers<'a>(
    overrides: &'a MetadataOverrides,
    env: &'a dyn EnvironmentVariables,
) -> Vec<Box<dyn MetadataResolver + 'a>> {
    vec![
        Box::new(CommandLineMetadataResolver::new(overrides)),
        Box::new(AppVeyorMetadataResolver::new(env)),
        Box::new(TravisMetadataResolver::new(env)),
        Box::new(GitHubActionsMetadataResolver::new(env)),
    ]
}

/// Assemble [`CoverageMetadata`]. Each field comes from the first active
/// resolver that has a value for it; service name and job id fall back to
/// the documented defaults.
pub fn resolve_metadata(resolvers: &[Box<dyn MetadataResolver + '_>], parallel: bool) -> CoverageMetadata {
    let active: Vec<&dyn MetadataResolver> = resolvers
        .iter()
        .map(|r| &**r)
        .filter(|r| r.is_active())
        .collect();
    let first = |resolve: fn(&dyn MetadataResolver) -> Option<String>| {
        active.iter().find_map(|r| resolve(*r))
    };

    let service_name = first(|r| r.resolve_service_name());
    let service_job_id = first(|r| r.resolve_service_job_id());
    let service_number = first(|r| r.resolve_service_build_number());
    let pull_request_id = first(|r| r.resolve_pull_request_id());
    tracing::debug!(
        active = active.len(),
        ?service_name,
        ?service_job_id,
        ?service_number,
        ?pull_request_id,
        "resolved coverage metadata"
    );

    CoverageMetadata {
        service_name: service_name.unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        service_job_id: service_job_id.unwrap_or_else(|| DEFAULT_SERVICE_JOB_ID.to_string()),
        service_number,
        pull_request_id,
        parallel,
    }
}

/// Read a variable, treating blank values as unset.
pub(crate) fn non_blank(env: &dyn EnvironmentVariables, name: &str) -> Option<String> {
    env.get_environment_variable(name)
        .filter(|v| !v.trim().is_empty())
}
