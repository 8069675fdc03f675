use std::path::Path;

use crate::builder::CoverageFileBuilder;
use crate::error::{LoadCoverageFilesError, ParseError};
use crate::mode::CoverageMode;
use crate::model::{CoverageFile, FileCoverageData};
use crate::parsers::{parser_for, FormatParser, XmlDocuments};
use crate::path::PathProcessor;
use crate::ports::FileSystem;
use crate::xml::XmlDocument;

type LoadResult<T> = std::result::Result<T, LoadCoverageFilesError>;

/// Reads a coverage report through the file port, parses it and turns every
/// record into a normalized [`CoverageFile`].
pub struct CoverageLoader<'a> {
    files: &'a dyn FileSystem,
}

impl<'a> CoverageLoader<'a> {
    pub fn new(files: &'a dyn FileSystem) -> Self {
        Self { files }
    }

    /// Like [`load_coverage_files`](Self::load_coverage_files), but takes the
    /// mode by name. Unknown names fail before any file is touched.
    pub fn load_coverage_files_by_name(
        &self,
        mode: &str,
        path_processor: &PathProcessor,
        mode_input: &Path,
        use_relative_paths: bool,
    ) -> LoadResult<Vec<CoverageFile>> {
        let mode: CoverageMode = mode.parse()?;
        self.load_coverage_files(mode, path_processor, mode_input, use_relative_paths)
    }

    /// The returned files keep the order in which the parser produced them.
    pub fn load_coverage_files(
        &self,
        mode: CoverageMode,
        path_processor: &PathProcessor,
        mode_input: &Path,
        use_relative_paths: bool,
    ) -> LoadResult<Vec<CoverageFile>> {
        tracing::debug!(%mode, input = %mode_input.display(), "loading coverage");
        let coverage_data = self.load_coverage_data(mode, mode_input)?;
        tracing::info!(%mode, files = coverage_data.len(), "parsed coverage report");

        Ok(coverage_data
            .into_iter()
            .map(|data| self.build_coverage_file(data, path_processor, use_relative_paths))
            .collect())
    }

    fn load_coverage_data(
        &self,
        mode: CoverageMode,
        mode_input: &Path,
    ) -> LoadResult<Vec<FileCoverageData>> {
        let malformed = |source: ParseError| LoadCoverageFilesError::MalformedInput {
            path: mode_input.to_path_buf(),
            source,
        };

        match parser_for(mode) {
            FormatParser::XmlDirectory(parse) => {
                let documents = self.load_xml_documents(mode_input)?;
                parse(&documents).map_err(malformed)
            }
            FormatParser::Lines(parse) => {
                let lines = self
                    .files
                    .try_read_all_lines_from_file(mode_input)
                    .ok_or_else(|| LoadCoverageFilesError::InputFileNotFound(mode_input.to_path_buf()))?;
                parse(&lines).map_err(malformed)
            }
            FormatParser::XmlDocument(parse) => {
                let text = self
                    .files
                    .try_load_file(mode_input)
                    .ok_or_else(|| LoadCoverageFilesError::InputFileNotFound(mode_input.to_path_buf()))?;
                let document = XmlDocument::parse(&text).map_err(malformed)?;
                parse(&document).map_err(malformed)
            }
        }
    }

    /// Load every `.xml` file (exact, case-sensitive suffix) in `directory`.
    fn load_xml_documents(&self, directory: &Path) -> LoadResult<XmlDocuments> {
        let entries = self
            .files
            .get_files(directory)
            .ok_or_else(|| LoadCoverageFilesError::InputFileNotFound(directory.to_path_buf()))?;

        let mut documents = XmlDocuments::new();
        for entry in entries.into_iter().filter(|e| e.name.ends_with(".xml")) {
            let text = self
                .files
                .try_load_file(&entry.full_path)
                .ok_or_else(|| LoadCoverageFilesError::UnknownFilesMissingError(entry.full_path.clone()))?;
            let document =
                XmlDocument::parse(&text).map_err(|source| LoadCoverageFilesError::MalformedInput {
                    path: entry.full_path.clone(),
                    source,
                })?;
            documents.insert(entry.name, document);
        }
        Ok(documents)
    }

    fn build_coverage_file(
        &self,
        data: FileCoverageData,
        path_processor: &PathProcessor,
        use_relative_paths: bool,
    ) -> CoverageFile {
        let full_path = data.full_path.clone();
        let mut builder = CoverageFileBuilder::new(data);

        let path = if use_relative_paths {
            path_processor.convert_path(&full_path)
        } else {
            full_path.clone()
        };
        builder.set_path(PathProcessor::unixify_path(&path));

        if !builder.has_source() {
            // Missing source is legal; the file is still reported.
            match self.files.try_load_file(Path::new(&full_path)) {
                Some(text) => builder.add_source(&text),
                None => tracing::debug!(path = %full_path, "source not found, reporting without it"),
            }
        }

        builder.create_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryFileSystem;

    fn processor() -> PathProcessor {
        PathProcessor::new("/repo")
    }

    #[test]
    fn test_lcov_with_source_fallback() {
        let fs = MemoryFileSystem::new()
            .with_file("/cov/lcov.info", "SF:/repo/src/a.rs\nDA:1,1\nDA:2,0\nend_of_record\n")
            .with_file("/repo/src/a.rs", "fn a() {\n    b();\n}\n\n");
        let loader = CoverageLoader::new(&fs);

        let files = loader
            .load_coverage_files(CoverageMode::LCov, &processor(), Path::new("/cov/lcov.info"), true)
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path(), "src/a.rs");
        assert_eq!(files[0].coverage(), &[Some(1), Some(0), None, None]);
    }

    #[test]
    fn test_absolute_paths_are_still_unixified() {
        let fs = MemoryFileSystem::new().with_file(
            "/cov/lcov.info",
            "SF:C:\\repo\\src\\a.rs\nDA:1,1\nend_of_record\n",
        );
        let loader = CoverageLoader::new(&fs);

        let files = loader
            .load_coverage_files(CoverageMode::LCov, &processor(), Path::new("/cov/lcov.info"), false)
            .unwrap();

        assert_eq!(files[0].path(), "C:/repo/src/a.rs");
        assert_eq!(files[0].coverage(), &[Some(1)]);
    }

    #[test]
    fn test_unknown_mode_performs_no_io() {
        let fs = MemoryFileSystem::new().with_file("/cov/lcov.info", "SF:/a\nend_of_record\n");
        let loader = CoverageLoader::new(&fs);

        let err = loader
            .load_coverage_files_by_name("clover", &processor(), Path::new("/cov/lcov.info"), true)
            .unwrap_err();

        assert!(matches!(err, LoadCoverageFilesError::ModeNotSupported(_)));
        assert_eq!(fs.calls(), 0);
    }

    #[test]
    fn test_missing_input_for_every_mode() {
        let fs = MemoryFileSystem::new();
        let loader = CoverageLoader::new(&fs);

        for mode in CoverageMode::ALL {
            let err = loader
                .load_coverage_files(mode, &processor(), Path::new("/nothing/here"), true)
                .unwrap_err();
            assert!(
                matches!(err, LoadCoverageFilesError::InputFileNotFound(ref p) if p == Path::new("/nothing/here")),
                "{mode}: {err}"
            );
        }
    }

    #[test]
    fn test_directory_mode_filters_xml_case_sensitively() {
        let class_doc = r#"<coverage><source sourceFile="/repo/src/W.cs"><l line="1" count="2">x</l></source></coverage>"#;
        let fs = MemoryFileSystem::new()
            .with_file("/mono/class-W.xml", class_doc)
            .with_file("/mono/class-Upper.XML", "not xml at all")
            .with_file("/mono/notes.txt", "not xml at all");
        let loader = CoverageLoader::new(&fs);

        let files = loader
            .load_coverage_files(CoverageMode::MonoCov, &processor(), Path::new("/mono"), true)
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path(), "src/W.cs");
        assert_eq!(files[0].coverage(), &[Some(2)]);
    }

    #[test]
    fn test_listed_document_that_cannot_be_read() {
        let fs = MemoryFileSystem::new().with_unreadable_entry("/mono/class-W.xml");
        let loader = CoverageLoader::new(&fs);

        let err = loader
            .load_coverage_files(CoverageMode::MonoCov, &processor(), Path::new("/mono"), true)
            .unwrap_err();

        assert!(matches!(err, LoadCoverageFilesError::UnknownFilesMissingError(_)));
    }

    #[test]
    fn test_malformed_document() {
        let fs = MemoryFileSystem::new().with_file("/cov/open.xml", "<CoverageSession><Modules>");
        let loader = CoverageLoader::new(&fs);

        let err = loader
            .load_coverage_files(CoverageMode::OpenCover, &processor(), Path::new("/cov/open.xml"), true)
            .unwrap_err();

        assert!(matches!(err, LoadCoverageFilesError::MalformedInput { .. }));
    }

    #[test]
    fn test_attached_source_skips_fallback_read() {
        let class_doc = r#"<coverage><source sourceFile="/repo/src/W.cs"><l line="1" count="2">x</l></source></coverage>"#;
        let fs = MemoryFileSystem::new()
            .with_file("/mono/class-W.xml", class_doc)
            .with_file("/repo/src/W.cs", "different\ntext\nentirely\n");
        let loader = CoverageLoader::new(&fs);

        let files = loader
            .load_coverage_files(CoverageMode::MonoCov, &processor(), Path::new("/mono"), true)
            .unwrap();

        // get_files + one document read; no read of the source file.
        assert_eq!(fs.calls(), 2);
        assert_eq!(files[0].coverage(), &[Some(2)]);
        assert_eq!(
            files[0].source_digest(),
            crate::builder::source_digest(&["x".to_string()])
        );
    }
}
