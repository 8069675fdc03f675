use std::path::{Path, PathBuf};

use covsubmit::path::PathProcessor;
use tempfile::TempDir;

/// Create a temporary repository root holding `files` (relative path, text).
/// The caller must hold onto `TempDir` to keep the directory alive.
pub fn setup_repo(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, text) in files {
        write(dir.path(), name, text);
    }
    dir
}

pub fn write(root: &Path, name: &str, text: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, text).unwrap();
    path
}

#[allow(dead_code)]
pub fn processor(dir: &TempDir) -> PathProcessor {
    PathProcessor::new(dir.path())
}
