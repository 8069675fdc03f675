pub mod chutzpah;
pub mod dynamic_code_coverage;
pub mod export_code_coverage;
pub mod lcov;
pub mod monocov;
pub mod ncover;
pub mod opencover;
pub mod report_generator;

use std::collections::{BTreeMap, HashMap};

use crate::error::{ParseError, Result};
use crate::mode::CoverageMode;
use crate::model::{FileCoverageData, LineHits};
use crate::xml::XmlDocument;

/// Documents of a directory-mode input, keyed by file name.
pub type XmlDocuments = BTreeMap<String, XmlDocument>;

/// Every format parser is a pure function with one of these shapes.
#[derive(Clone, Copy)]
pub enum FormatParser {
    XmlDirectory(fn(&XmlDocuments) -> Result<Vec<FileCoverageData>>),
    Lines(fn(&[String]) -> Result<Vec<FileCoverageData>>),
    XmlDocument(fn(&XmlDocument) -> Result<Vec<FileCoverageData>>),
}

impl std::fmt::Debug for FormatParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatParser::XmlDirectory(_) => f.write_str("FormatParser::XmlDirectory"),
            FormatParser::Lines(_) => f.write_str("FormatParser::Lines"),
            FormatParser::XmlDocument(_) => f.write_str("FormatParser::XmlDocument"),
        }
    }
}

/// Select the parser for a coverage mode.
pub fn parser_for(mode: CoverageMode) -> FormatParser {
    match mode {
        CoverageMode::MonoCov => FormatParser::XmlDirectory(monocov::parse),
        CoverageMode::ReportGenerator => FormatParser::XmlDirectory(report_generator::parse),
        CoverageMode::LCov => FormatParser::Lines(lcov::parse),
        CoverageMode::Chutzpah => FormatParser::Lines(chutzpah::parse),
        CoverageMode::OpenCover => FormatParser::XmlDocument(opencover::parse),
        CoverageMode::NCover => FormatParser::XmlDocument(ncover::parse),
        CoverageMode::DynamicCodeCoverage => {
            FormatParser::XmlDocument(dynamic_code_coverage::parse)
        }
        CoverageMode::ExportCodeCoverage => FormatParser::XmlDocument(export_code_coverage::parse),
    }
}

/// Accumulates per-line hit counts for a set of files, keeping the order in
/// which files were first seen.
#[derive(Debug, Default)]
pub(crate) struct FileHits {
    order: Vec<String>,
    lines: HashMap<String, BTreeMap<u32, i64>>,
}

impl FileHits {
    /// Make sure `path` is emitted even if it never receives a hit.
    pub fn touch(&mut self, path: &str) -> &mut BTreeMap<u32, i64> {
        if !self.lines.contains_key(path) {
            self.order.push(path.to_string());
        }
        self.lines.entry(path.to_string()).or_default()
    }

    /// Record hits for a 1-based line. When several points land on the same
    /// line the largest count wins.
    pub fn record(&mut self, path: &str, line: u32, hits: i64) {
        if line == 0 {
            return;
        }
        self.touch(path)
            .entry(line)
            .and_modify(|h| *h = (*h).max(hits))
            .or_insert(hits);
    }

    pub fn into_files(mut self) -> Vec<FileCoverageData> {
        self.order
            .into_iter()
            .map(|path| {
                let lines = self.lines.remove(&path).unwrap_or_default();
                let coverage = coverage_array(&lines);
                FileCoverageData::new(path, coverage)
            })
            .collect()
    }
}

/// Dense coverage array: slot `n - 1` holds line `n`, gaps are `None`.
pub(crate) fn coverage_array(lines: &BTreeMap<u32, i64>) -> Vec<LineHits> {
    let len = lines.keys().next_back().copied().unwrap_or(0) as usize;
    let mut coverage = vec![None; len];
    for (&line, &hits) in lines {
        coverage[line as usize - 1] = Some(hits);
    }
    coverage
}

/// Highest line number a report may mention. Coverage arrays are dense, so
/// larger values would size an allocation from untrusted input.
pub const MAX_LINE: u32 = 1_000_000;

/// Parse a 1-based line number, rejecting values above [`MAX_LINE`].
pub(crate) fn parse_line(value: &str, what: &str) -> Result<u32> {
    let line: u32 = parse_number(value, what)?;
    check_line(line, what)
}

pub(crate) fn check_line(line: u32, what: &str) -> Result<u32> {
    if line > MAX_LINE {
        return Err(ParseError::Invalid(format!(
            "{what} {line} exceeds the maximum of {MAX_LINE}"
        )));
    }
    Ok(line)
}

/// Parse a required numeric attribute.
pub(crate) fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ParseError::Invalid(format!("invalid {what}: '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_hits_keeps_first_seen_order_and_max() {
        let mut hits = FileHits::default();
        hits.record("b.cs", 3, 0);
        hits.record("a.cs", 1, 2);
        hits.record("b.cs", 3, 4);
        hits.record("b.cs", 1, 1);
        hits.touch("c.cs");

        let files = hits.into_files();
        let paths: Vec<_> = files.iter().map(|f| f.full_path.as_str()).collect();
        assert_eq!(paths, vec!["b.cs", "a.cs", "c.cs"]);
        assert_eq!(files[0].coverage, vec![Some(1), None, Some(4)]);
        assert_eq!(files[1].coverage, vec![Some(2)]);
        assert!(files[2].coverage.is_empty());
    }

    #[test]
    fn test_line_zero_is_ignored() {
        let mut hits = FileHits::default();
        hits.record("a.cs", 0, 5);
        let files = hits.into_files();
        assert!(files.is_empty());
    }

    #[test]
    fn test_parse_line_bounds() {
        assert_eq!(parse_line(" 12 ", "line").unwrap(), 12);
        assert_eq!(parse_line("1000000", "line").unwrap(), MAX_LINE);
        assert!(matches!(
            parse_line("1000001", "line"),
            Err(ParseError::Invalid(_))
        ));
        assert!(parse_line("4000000000", "line").is_err());
        assert!(parse_line("-1", "line").is_err());
    }

    #[test]
    fn test_every_mode_has_a_parser_of_its_input_kind() {
        use crate::mode::InputKind;
        for mode in CoverageMode::ALL {
            let matches = matches!(
                (mode.input_kind(), parser_for(mode)),
                (InputKind::XmlDirectory, FormatParser::XmlDirectory(_))
                    | (InputKind::Lines, FormatParser::Lines(_))
                    | (InputKind::XmlDocument, FormatParser::XmlDocument(_))
            );
            assert!(matches, "{mode} has a parser of the wrong shape");
        }
    }
}
