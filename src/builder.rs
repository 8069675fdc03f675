//! Reconciles one file's reported coverage against its source text.

use md5::{Digest, Md5};

use crate::model::{CoverageFile, FileCoverageData, LineHits};

/// Split text into lines, treating `\r\n`, `\n` and a lone `\r` as line
/// terminators. A trailing terminator does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(idx) => {
                lines.push(rest[..idx].to_string());
                let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + skip..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}

/// Lowercase hex MD5 of the source lines joined by `\n`.
pub fn source_digest(lines: &[String]) -> String {
    let mut hasher = Md5::new();
    hasher.update(lines.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}

/// Mutable staging for a single [`CoverageFile`].
#[derive(Debug)]
pub struct CoverageFileBuilder {
    coverage: Vec<LineHits>,
    path: String,
    source_lines: Vec<String>,
}

impl CoverageFileBuilder {
    pub fn new(data: FileCoverageData) -> Self {
        Self {
            coverage: data.coverage,
            path: data.full_path,
            source_lines: data.source.unwrap_or_default(),
        }
    }

    pub fn has_source(&self) -> bool {
        !self.source_lines.is_empty()
    }

    /// Replace any attached source with the lines of `source`.
    pub fn add_source(&mut self, source: &str) {
        self.source_lines = split_lines(source);
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn create_file(self) -> CoverageFile {
        let digest = source_digest(&self.source_lines);
        let mut coverage = self.coverage;
        if self.source_lines.len() > coverage.len() {
            // Lines past the report carry no data; they are not "uncovered".
            coverage.resize(self.source_lines.len(), None);
        }
        CoverageFile::new(self.path, digest, coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(coverage: Vec<LineHits>) -> FileCoverageData {
        FileCoverageData::new("/repo/src/a.cs", coverage)
    }

    #[test]
    fn test_split_lines_universal_newlines() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_source_pads_coverage_with_none() {
        let mut builder = CoverageFileBuilder::new(data(vec![Some(1), Some(0)]));
        builder.add_source("a\nb\nc\nd\n");
        let file = builder.create_file();

        assert_eq!(file.coverage(), &[Some(1), Some(0), None, None]);
    }

    #[test]
    fn test_longer_coverage_is_kept_as_is() {
        let mut builder = CoverageFileBuilder::new(data(vec![Some(1), None, Some(3)]));
        builder.add_source("only one line");
        let file = builder.create_file();

        assert_eq!(file.coverage(), &[Some(1), None, Some(3)]);
        assert_eq!(file.source_digest(), source_digest(&["only one line".to_string()]));
    }

    #[test]
    fn test_no_source_digests_empty_string() {
        let file = CoverageFileBuilder::new(data(vec![Some(2)])).create_file();
        // md5("")
        assert_eq!(file.source_digest(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(file.coverage(), &[Some(2)]);
    }

    #[test]
    fn test_digest_joins_with_single_newline() {
        let mut builder = CoverageFileBuilder::new(data(vec![]));
        builder.add_source("a\r\nb\r\n");
        let file = builder.create_file();
        // md5("a\nb")
        assert_eq!(file.source_digest(), "8cdeb44417f3c26826595d5820cf5700");
    }

    #[test]
    fn test_digest_tracks_source_text() {
        let build = |text: &str| {
            let mut builder = CoverageFileBuilder::new(data(vec![Some(1)]));
            builder.add_source(text);
            builder.create_file().source_digest().to_string()
        };
        assert_eq!(build("fn main() {}"), build("fn main() {}"));
        assert_ne!(build("fn main() {}"), build("fn main() {};"));
    }

    #[test]
    fn test_attached_source_and_replacement() {
        let with_source = data(vec![Some(1)]).with_source(vec!["x".into(), "y".into()]);
        let mut builder = CoverageFileBuilder::new(with_source);
        assert!(builder.has_source());

        builder.add_source("z");
        let file = builder.create_file();
        assert_eq!(file.source_digest(), source_digest(&["z".to_string()]));
        assert_eq!(file.coverage(), &[Some(1)]);
    }

    #[test]
    fn test_set_path() {
        let mut builder = CoverageFileBuilder::new(data(vec![]));
        assert!(!builder.has_source());
        builder.set_path("src/a.cs");
        assert_eq!(builder.create_file().path(), "src/a.cs");
    }
}
