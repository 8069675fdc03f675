/// Parser for the XML produced by `CodeCoverage.exe analyze` (Microsoft
/// dynamic code coverage).
///
///   <results>
///     <modules>
///       <module name="widgets.dll" ...>
///         <functions>
///           <function name="Spin" ...>
///             <ranges>
///               <range source_id="0" covered="yes|no|partial"
///                      start_line="10" start_column="9"
///                      end_line="11" end_column="10"/>
///             </ranges>
///           </function>
///         </functions>
///         <source_files>
///           <source_file id="0" path="C:\src\Widget.cs"/>
///         </source_files>
///       </module>
///     </modules>
///   </results>
///
/// Source ids are scoped to their module. A range marks every line from
/// `start_line` through `end_line`.
use std::collections::HashMap;

use super::{parse_line, FileHits};
use crate::error::{ParseError, Result};
use crate::model::FileCoverageData;
use crate::xml::XmlDocument;

pub fn parse(document: &XmlDocument) -> Result<Vec<FileCoverageData>> {
    let mut hits = FileHits::default();

    for module in document.root().descendants_named("module") {
        let sources: HashMap<&str, &str> = module
            .descendants_named("source_file")
            .into_iter()
            .filter_map(|f| Some((f.attr("id")?, f.attr("path")?)))
            .collect();

        for range in module.descendants_named("range") {
            let Some(path) = range.attr("source_id").and_then(|id| sources.get(id)) else {
                continue;
            };
            let visits = match range.attr("covered") {
                Some("yes") | Some("partial") => 1,
                Some("no") => 0,
                other => {
                    return Err(ParseError::Invalid(format!(
                        "invalid range coverage: {:?}",
                        other.unwrap_or_default()
                    )))
                }
            };
            let start = parse_line(range.attr("start_line").unwrap_or("0"), "start_line")?;
            let end: u32 = match range.attr("end_line") {
                Some(end) => parse_line(end, "end_line")?,
                None => start,
            };
            for line in start..=end.max(start) {
                hits.record(path, line, visits);
            }
        }
    }

    Ok(hits.into_files())
}
