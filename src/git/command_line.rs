use super::GitDataResolver;
use crate::model::{GitData, GitHead, GitInfo};

/// Git values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOverrides {
    pub commit_id: Option<String>,
    pub branch: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl GitOverrides {
    fn any(&self) -> bool {
        [&self.commit_id, &self.branch, &self.author, &self.email, &self.message]
            .into_iter()
            .any(|v| given(v).is_some())
    }
}

fn given(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

pub struct CommandLineGitDataResolver<'a> {
    overrides: &'a GitOverrides,
}

impl<'a> CommandLineGitDataResolver<'a> {
    pub fn new(overrides: &'a GitOverrides) -> Self {
        Self { overrides }
    }
}

impl GitDataResolver for CommandLineGitDataResolver<'_> {
    fn can_provide_data(&self) -> bool {
        self.overrides.any()
    }

    fn generate_data(&self) -> Option<GitInfo> {
        let o = self.overrides;
        let id = given(&o.commit_id)?;
        let author = given(&o.author).unwrap_or_default();
        let email = given(&o.email).unwrap_or_default();

        Some(GitInfo::Full(GitData {
            head: GitHead {
                id,
                author_name: author.clone(),
                author_email: email.clone(),
                committer_name: author,
                committer_email: email,
                message: given(&o.message).unwrap_or_default(),
            },
            branch: given(&o.branch).unwrap_or_default(),
            tag: None,
        }))
    }

    fn display_name(&self) -> &'static str {
        "command line"
    }
}
