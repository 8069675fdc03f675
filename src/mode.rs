//! Supported coverage report dialects.
//!
//! Each mode selects one format parser and the way its input is acquired:
//! a directory of XML documents, a line-oriented text file, or a single XML
//! document.
use crate::error::LoadCoverageFilesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageMode {
    LCov,
    OpenCover,
    NCover,
    MonoCov,
    ReportGenerator,
    Chutzpah,
    DynamicCodeCoverage,
    ExportCodeCoverage,
}

/// How the loader acquires raw input for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Every `.xml` file inside a directory.
    XmlDirectory,
    /// All lines of a text file.
    Lines,
    /// One XML document.
    XmlDocument,
}

impl CoverageMode {
    pub const ALL: [CoverageMode; 8] = [
        CoverageMode::LCov,
        CoverageMode::OpenCover,
        CoverageMode::NCover,
        CoverageMode::MonoCov,
        CoverageMode::ReportGenerator,
        CoverageMode::Chutzpah,
        CoverageMode::DynamicCodeCoverage,
        CoverageMode::ExportCodeCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageMode::LCov => "lcov",
            CoverageMode::OpenCover => "opencover",
            CoverageMode::NCover => "ncover",
            CoverageMode::MonoCov => "monocov",
            CoverageMode::ReportGenerator => "reportgenerator",
            CoverageMode::Chutzpah => "chutzpah",
            CoverageMode::DynamicCodeCoverage => "dynamiccodecoverage",
            CoverageMode::ExportCodeCoverage => "exportcodecoverage",
        }
    }

    pub fn input_kind(&self) -> InputKind {
        match self {
            CoverageMode::MonoCov | CoverageMode::ReportGenerator => InputKind::XmlDirectory,
            CoverageMode::LCov | CoverageMode::Chutzpah => InputKind::Lines,
            CoverageMode::OpenCover
            | CoverageMode::NCover
            | CoverageMode::DynamicCodeCoverage
            | CoverageMode::ExportCodeCoverage => InputKind::XmlDocument,
        }
    }
}

impl std::str::FromStr for CoverageMode {
    type Err = LoadCoverageFilesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CoverageMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| LoadCoverageFilesError::ModeNotSupported(s.to_string()))
    }
}

impl std::fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
