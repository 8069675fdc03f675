/// Parser for Visual Studio coverage exported to XML (`CoverageDSPriv`).
///
///   <CoverageDSPriv>
///     <Module>
///       <NamespaceTable><Class><Method>
///         <Lines>
///           <LnStart>10</LnStart><ColStart>9</ColStart>
///           <LnEnd>10</LnEnd><ColEnd>10</ColEnd>
///           <Coverage>0</Coverage>
///           <SourceFileID>1</SourceFileID>
///           <LineID>0</LineID>
///         </Lines>
///       </Method></Class></NamespaceTable>
///     </Module>
///     <SourceFileNames>
///       <SourceFileID>1</SourceFileID>
///       <SourceFileName>C:\src\Widget.cs</SourceFileName>
///     </SourceFileNames>
///   </CoverageDSPriv>
///
/// `Coverage` is 0 (covered), 1 (partially covered) or 2 (not covered).
use std::collections::HashMap;

use super::{parse_line, FileHits};
use crate::error::{ParseError, Result};
use crate::model::FileCoverageData;
use crate::xml::XmlDocument;

pub fn parse(document: &XmlDocument) -> Result<Vec<FileCoverageData>> {
    let root = document.root();
    let sources: HashMap<&str, &str> = root
        .descendants_named("SourceFileNames")
        .into_iter()
        .filter_map(|s| Some((s.child_text("SourceFileID")?, s.child_text("SourceFileName")?)))
        .collect();

    let mut hits = FileHits::default();
    for lines in root.descendants_named("Lines") {
        let Some(path) = lines
            .child_text("SourceFileID")
            .and_then(|id| sources.get(id))
        else {
            continue;
        };
        let visits = match lines.child_text("Coverage") {
            Some("0") | Some("1") => 1,
            Some("2") => 0,
            other => {
                return Err(ParseError::Invalid(format!(
                    "invalid Lines coverage: {:?}",
                    other.unwrap_or_default()
                )))
            }
        };
        let start = parse_line(lines.child_text("LnStart").unwrap_or("0"), "LnStart")?;
        let end: u32 = match lines.child_text("LnEnd") {
            Some(end) => parse_line(end, "LnEnd")?,
            None => start,
        };
        for line in start..=end.max(start) {
            hits.record(path, line, visits);
        }
    }

    Ok(hits.into_files())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_code_coverage() {
        let doc = XmlDocument::parse(include_str!("../../tests/fixtures/export_code_coverage.xml"))
            .unwrap();
        let files = parse(&doc).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].full_path, r"C:\repo\src\Widget.cs");
        assert_eq!(files[0].coverage, vec![None, Some(1), Some(1), Some(0)]);
        assert_eq!(files[1].full_path, r"C:\repo\src\Gear.cs");
        assert_eq!(files[1].coverage, vec![Some(1)]);
    }

    #[test]
    fn test_lines_with_unknown_source_are_skipped() {
        let doc = XmlDocument::parse(
            "<CoverageDSPriv><Module><Lines><LnStart>1</LnStart><LnEnd>1</LnEnd>\
             <Coverage>0</Coverage><SourceFileID>9</SourceFileID></Lines></Module>\
             </CoverageDSPriv>",
        )
        .unwrap();
        assert!(parse(&doc).unwrap().is_empty());
    }
}
