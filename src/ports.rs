//! Read-only environment access and optional-returning file access.
//!
//! The pipeline only talks to the outside world through these two traits.
//! `ProcessEnvironment` and `LocalFileSystem` are the production adapters;
//! the `Memory*` adapters back tests and dry runs.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::split_lines;

/// Port for named environment values.
pub trait EnvironmentVariables {
    fn get_environment_variable(&self, name: &str) -> Option<String>;

    /// True iff the value is `true`, ignoring ASCII case and surrounding
    /// whitespace. Absence and every other value are false.
    fn get_boolean_variable(&self, name: &str) -> bool {
        self.get_environment_variable(name)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// A file found by [`FileSystem::get_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub full_path: PathBuf,
}

/// Port for file and directory access. Absence is reported as `None`,
/// never as an error.
pub trait FileSystem {
    fn try_load_file(&self, path: &Path) -> Option<String>;

    /// Files directly inside `directory`, or `None` if it does not exist.
    fn get_files(&self, directory: &Path) -> Option<Vec<FileEntry>>;

    fn write_file(&self, path: &Path, text: &str) -> bool;

    fn try_read_all_lines_from_file(&self, path: &Path) -> Option<Vec<String>>;
}

/// Environment backed by the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentVariables for ProcessEnvironment {
    fn get_environment_variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Filesystem backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn try_load_file(&self, path: &Path) -> Option<String> {
        if !path.is_file() {
            return None;
        }
        match fs::read(path) {
            Ok(bytes) => Some(decode_text(&bytes)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "failed to read file");
                None
            }
        }
    }

    fn get_files(&self, directory: &Path) -> Option<Vec<FileEntry>> {
        let entries = fs::read_dir(directory).ok()?;
        let mut files: Vec<FileEntry> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                full_path: entry.path(),
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Some(files)
    }

    fn write_file(&self, path: &Path, text: &str) -> bool {
        match fs::write(path, text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write file");
                false
            }
        }
    }

    fn try_read_all_lines_from_file(&self, path: &Path) -> Option<Vec<String>> {
        self.try_load_file(path).map(|text| split_lines(&text))
    }
}

/// Decode file contents the way .NET's text readers do: a leading UTF-8
/// byte-order mark is dropped and invalid sequences become U+FFFD rather
/// than failing the read.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Environment backed by a fixed map.
#[derive(Debug, Default, Clone)]
pub struct MemoryEnvironment {
    vars: HashMap<String, String>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvironmentVariables for MemoryEnvironment {
    fn get_environment_variable(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// In-memory filesystem that counts every port call it serves.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
    written: RefCell<BTreeMap<PathBuf, String>>,
    calls: Cell<usize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; its parent directory starts to exist as well.
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.insert(parent.to_path_buf());
        }
        self.files.insert(path, text.to_string());
        self
    }

    /// Add an entry that shows up in directory listings but cannot be read.
    pub fn with_unreadable_entry(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.insert(parent.to_path_buf());
        }
        self.unreadable.insert(path);
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Number of port calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Text written through [`FileSystem::write_file`].
    pub fn written(&self, path: &Path) -> Option<String> {
        self.written.borrow().get(path).cloned()
    }

    fn record_call(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    fn read(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn try_load_file(&self, path: &Path) -> Option<String> {
        self.record_call();
        self.read(path)
    }

    fn get_files(&self, directory: &Path) -> Option<Vec<FileEntry>> {
        self.record_call();
        if !self.dirs.contains(directory) {
            return None;
        }
        Some(
            self.files
                .keys()
                .chain(self.unreadable.iter())
                .filter(|path| path.parent() == Some(directory))
                .map(|path| FileEntry {
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    full_path: path.clone(),
                })
                .collect(),
        )
    }

    fn write_file(&self, path: &Path, text: &str) -> bool {
        self.record_call();
        self.written
            .borrow_mut()
            .insert(path.to_path_buf(), text.to_string());
        true
    }

    fn try_read_all_lines_from_file(&self, path: &Path) -> Option<Vec<String>> {
        self.record_call();
        self.read(path).map(|text| split_lines(&text))
    }
}
