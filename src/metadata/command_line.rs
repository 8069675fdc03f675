use super::MetadataResolver;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataOverrides {
    pub service_name: Option<String>,
    pub job_id: Option<String>,
    pub build_number: Option<String>,
    pub pull_request_id: Option<String>,
}

/// Always active; returns whichever overrides were given.
pub struct CommandLineMetadataResolver<'a> {
    overrides: &'a MetadataOverrides,
}

impl<'a> CommandLineMetadataResolver<'a> {
    pub fn new(overrides: &'a MetadataOverrides) -> Self {
        Self { overrides }
    }
}

fn given(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

impl MetadataResolver for CommandLineMetadataResolver<'_> {
    fn is_active(&self) -> bool {
        true
    }

    fn resolve_service_name(&self) -> Option<String> {
        given(&self.overrides.service_name)
    }

    fn resolve_service_job_id(&self) -> Option<String> {
        given(&self.overrides.job_id)
    }

    fn resolve_service_build_number(&self) -> Option<String> {
        given(&self.overrides.build_number)
    }

    fn resolve_pull_request_id(&self) -> Option<String> {
        given(&self.overrides.pull_request_id)
    }
}
