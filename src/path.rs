//! Repository-relative, forward-slash path normalization.

use std::path::Path;

/// Converts absolute paths found in coverage reports into paths relative to
/// a repository root.
#[derive(Debug, Clone)]
pub struct PathProcessor {
    base: String,
}

impl PathProcessor {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        let base = Self::unixify_path(&base_path.as_ref().to_string_lossy());
        let trimmed = base.trim_end_matches('/');
        // The filesystem root keeps its separator.
        let base = if trimmed.is_empty() && base.starts_with('/') {
            "/"
        } else {
            trimmed
        };
        Self {
            base: base.to_string(),
        }
    }

    /// Strip the repository root from `path`.
    ///
    /// Matching ignores separator style and ASCII case, since reports are
    /// frequently produced on Windows. Paths outside the root come back
    /// unchanged.
    pub fn convert_path(&self, path: &str) -> String {
        if self.base.is_empty() {
            return path.to_string();
        }
        let unixified = Self::unixify_path(path);
        let Some(prefix) = unixified.get(..self.base.len()) else {
            return path.to_string();
        };
        if !prefix.eq_ignore_ascii_case(&self.base) {
            return path.to_string();
        }
        let rest = &unixified[self.base.len()..];
        // "/repo" must not claim "/repository/x".
        if !rest.is_empty() && !rest.starts_with('/') && !self.base.ends_with('/') {
            return path.to_string();
        }
        // Offsets are identical in both strings; only separators differ.
        path[self.base.len()..]
            .trim_start_matches(['/', '\\'])
            .to_string()
    }

    pub fn unixify_path(path: &str) -> String {
        path.replace('\\', "/")
    }
}
