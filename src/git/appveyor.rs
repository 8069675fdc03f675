use super::GitDataResolver;
use crate::metadata::non_blank;
use crate::model::{GitData, GitHead, GitInfo};
use crate::ports::EnvironmentVariables;

/// AppVeyor exposes a single commit author, so it fills both the author and
/// the committer.
pub struct AppVeyorGitDataResolver<'a> {
    env: &'a dyn EnvironmentVariables,
}

impl<'a> AppVeyorGitDataResolver<'a> {
    pub fn new(env: &'a dyn EnvironmentVariables) -> Self {
        Self { env }
    }

    fn var(&self, name: &str) -> String {
        non_blank(self.env, name).unwrap_or_default()
    }

    fn message(&self) -> String {
        let message = self.var("APPVEYOR_REPO_COMMIT_MESSAGE");
        match non_blank(self.env, "APPVEYOR_REPO_COMMIT_MESSAGE_EXTENDED") {
            Some(extended) => format!("{message}\n{extended}"),
            None => message,
        }
    }

    fn tag(&self) -> Option<String> {
        if self.env.get_boolean_variable("APPVEYOR_REPO_TAG") {
            non_blank(self.env, "APPVEYOR_REPO_TAG_NAME")
        } else {
            None
        }
    }
}

impl GitDataResolver for AppVeyorGitDataResolver<'_> {
    fn can_provide_data(&self) -> bool {
        self.env.get_boolean_variable("APPVEYOR")
    }

    fn generate_data(&self) -> Option<GitInfo> {
        let id = non_blank(self.env, "APPVEYOR_REPO_COMMIT")?;
        let author = self.var("APPVEYOR_REPO_COMMIT_AUTHOR");
        let email = self.var("APPVEYOR_REPO_COMMIT_AUTHOR_EMAIL");

        Some(GitInfo::Full(GitData {
            head: GitHead {
                id,
                author_name: author.clone(),
                author_email: email.clone(),
                committer_name: author,
                committer_email: email,
                message: self.message(),
            },
            branch: self.var("APPVEYOR_REPO_BRANCH"),
            tag: self.tag(),
        }))
    }

    fn display_name(&self) -> &'static str {
        "AppVeyor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryEnvironment;

    fn appveyor() -> MemoryEnvironment {
        MemoryEnvironment::new()
            .with("APPVEYOR", "True")
            .with("APPVEYOR_REPO_COMMIT", "abc123")
            .with("APPVEYOR_REPO_COMMIT_AUTHOR", "Jane Doe")
            .with("APPVEYOR_REPO_COMMIT_AUTHOR_EMAIL", "jane@example.com")
            .with("APPVEYOR_REPO_COMMIT_MESSAGE", "fix bug")
            .with("APPVEYOR_REPO_BRANCH", "main")
    }

    #[test]
    fn test_inactive_outside_appveyor() {
        let env = MemoryEnvironment::new().with("APPVEYOR_REPO_COMMIT", "abc123");
        assert!(!AppVeyorGitDataResolver::new(&env).can_provide_data());
    }

    #[test]
    fn test_extended_message_and_tag() {
        let env = appveyor()
            .with("APPVEYOR_REPO_COMMIT_MESSAGE_EXTENDED", "details here")
            .with("APPVEYOR_REPO_TAG", "true")
            .with("APPVEYOR_REPO_TAG_NAME", "v1.2.0");
        let info = AppVeyorGitDataResolver::new(&env).generate_data().unwrap();
        let data = info.git_data().unwrap();

        assert_eq!(data.head.message, "fix bug\ndetails here");
        assert_eq!(data.tag.as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn test_tag_name_ignored_unless_tag_build() {
        let env = appveyor().with("APPVEYOR_REPO_TAG_NAME", "v1.2.0");
        let info = AppVeyorGitDataResolver::new(&env).generate_data().unwrap();
        assert_eq!(info.git_data().unwrap().tag, None);
    }

    #[test]
    fn test_missing_commit_yields_nothing() {
        let env = MemoryEnvironment::new()
            .with("APPVEYOR", "True")
            .with("APPVEYOR_REPO_BRANCH", "main");
        let resolver = AppVeyorGitDataResolver::new(&env);
        assert!(resolver.can_provide_data());
        assert!(resolver.generate_data().is_none());
    }
}
