/// Parser for NCover (1.x classic) XML reports.
///
///   <coverage>
///     <module name="...">
///       <method name="..." class="...">
///         <seqpnt visitcount="1" line="10" column="9" endline="10"
///                 endcolumn="10" excluded="false" document="C:\src\Foo.cs"/>
///       </method>
///     </module>
///   </coverage>
use super::{parse_line, parse_number, FileHits};
use crate::error::Result;
use crate::model::FileCoverageData;
use crate::xml::XmlDocument;

pub fn parse(document: &XmlDocument) -> Result<Vec<FileCoverageData>> {
    let mut hits = FileHits::default();

    for point in document.root().descendants_named("seqpnt") {
        if point.attr("excluded") == Some("true") {
            continue;
        }
        let Some(path) = point.attr("document") else {
            continue;
        };
        let line = parse_line(point.attr("line").unwrap_or("0"), "seqpnt line")?;
        let visits: i64 = parse_number(point.attr("visitcount").unwrap_or("0"), "visit count")?;
        hits.record(path, line, visits);
    }

    Ok(hits.into_files())
}
