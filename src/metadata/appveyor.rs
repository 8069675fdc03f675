use super::{non_blank, MetadataResolver};
use crate::ports::EnvironmentVariables;

pub struct AppVeyorMetadataResolver<'a> {
    env: &'a dyn EnvironmentVariables,
}

impl<'a> AppVeyorMetadataResolver<'a> {
    pub fn new(env: &'a dyn EnvironmentVariables) -> Self {
        Self { env }
    }
}

impl MetadataResolver for AppVeyorMetadataResolver<'_> {
    fn is_active(&self) -> bool {
        self.env.get_boolean_variable("APPVEYOR")
    }

    fn resolve_service_name(&self) -> Option<String> {
        Some("appveyor".to_string())
    }

    fn resolve_service_job_id(&self) -> Option<String> {
        non_blank(self.env, "APPVEYOR_JOB_ID")
    }

    fn resolve_service_build_number(&self) -> Option<String> {
        non_blank(self.env, "APPVEYOR_BUILD_NUMBER")
    }

    fn resolve_pull_request_id(&self) -> Option<String> {
        non_blank(self.env, "APPVEYOR_PULL_REQUEST_NUMBER")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryEnvironment;

    #[test]
    fn test_inactive_without_flag() {
        let env = MemoryEnvironment::new().with("APPVEYOR_JOB_ID", "1");
        assert!(!AppVeyorMetadataResolver::new(&env).is_active());

        let env = MemoryEnvironment::new().with("APPVEYOR", "False");
        assert!(!AppVeyorMetadataResolver::new(&env).is_active());
    }

    #[test]
    fn test_resolves_appveyor_variables() {
        let env = MemoryEnvironment::new()
            .with("APPVEYOR", "True")
            .with("APPVEYOR_JOB_ID", "abc-1")
            .with("APPVEYOR_BUILD_NUMBER", "77")
            .with("APPVEYOR_PULL_REQUEST_NUMBER", "12");
        let resolver = AppVeyorMetadataResolver::new(&env);

        assert!(resolver.is_active());
        assert_eq!(resolver.resolve_service_name().as_deref(), Some("appveyor"));
        assert_eq!(resolver.resolve_service_job_id().as_deref(), Some("abc-1"));
        assert_eq!(resolver.resolve_service_build_number().as_deref(), Some("77"));
        assert_eq!(resolver.resolve_pull_request_id().as_deref(), Some("12"));
    }

    #[test]
    fn test_unset_variables_are_absent() {
        let env = MemoryEnvironment::new().with("APPVEYOR", "True").with("APPVEYOR_JOB_ID", " ");
        let resolver = AppVeyorMetadataResolver::new(&env);

        assert_eq!(resolver.resolve_service_job_id(), None);
        assert_eq!(resolver.resolve_service_build_number(), None);
        assert_eq!(resolver.resolve_pull_request_id(), None);
    }
}
