use super::{non_blank, MetadataResolver};
use crate::ports::EnvironmentVariables;

pub struct GitHubActionsMetadataResolver<'a> {
    env: &'a dyn EnvironmentVariables,
}

impl<'a> GitHubActionsMetadataResolver<'a> {
    pub fn new(env: &'a dyn EnvironmentVariables) -> Self {
        Self { env }
    }
}

impl MetadataResolver for GitHubActionsMetadataResolver<'_> {
    fn is_active(&self) -> bool {
        self.env.get_boolean_variable("GITHUB_ACTIONS")
    }

    fn resolve_service_name(&self) -> Option<String> {
        Some("github".to_string())
    }

    fn resolve_service_job_id(&self) -> Option<String> {
        non_blank(self.env, "GITHUB_RUN_ID")
    }

    fn resolve_service_build_number(&self) -> Option<String> {
        non_blank(self.env, "GITHUB_RUN_NUMBER")
    }

    fn resolve_pull_request_id(&self) -> Option<String> {
        let github_ref = non_blank(self.env, "GITHUB_REF")?;
        pr_number_from_ref(&github_ref).map(|n| n.to_string())
    }
}

/// Extract PR number from a ref (e.g. "refs/pull/42/merge" → 42).
fn pr_number_from_ref(github_ref: &str) -> Option<u64> {
    let parts: Vec<&str> = github_ref.split('/').collect();
    if parts.len() >= 3 && parts[0] == "refs" && parts[1] == "pull" {
        parts[2].parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryEnvironment;

    #[test]
    fn test_pr_number_from_ref() {
        assert_eq!(pr_number_from_ref("refs/pull/42/merge"), Some(42));
        assert_eq!(pr_number_from_ref("refs/heads/main"), None);
        assert_eq!(pr_number_from_ref("refs/pull/abc/merge"), None);
        assert_eq!(pr_number_from_ref("refs"), None);
    }

    #[test]
    fn test_resolves_github_variables() {
        let env = MemoryEnvironment::new()
            .with("GITHUB_ACTIONS", "true")
            .with("GITHUB_RUN_ID", "123456")
            .with("GITHUB_RUN_NUMBER", "8")
            .with("GITHUB_REF", "refs/pull/5/merge");
        let resolver = GitHubActionsMetadataResolver::new(&env);

        assert!(resolver.is_active());
        assert_eq!(resolver.resolve_service_name().as_deref(), Some("github"));
        assert_eq!(resolver.resolve_service_job_id().as_deref(), Some("123456"));
        assert_eq!(resolver.resolve_service_build_number().as_deref(), Some("8"));
        assert_eq!(resolver.resolve_pull_request_id().as_deref(), Some("5"));
    }

    #[test]
    fn test_branch_build_has_no_pull_request() {
        let env = MemoryEnvironment::new()
            .with("GITHUB_ACTIONS", "true")
            .with("GITHUB_REF", "refs/heads/main");
        assert_eq!(GitHubActionsMetadataResolver::new(&env).resolve_pull_request_id(), None);
    }
}
