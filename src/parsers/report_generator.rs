/// Parser for a ReportGenerator XML report directory (`-reporttypes:Xml`).
///
/// One document per class plus a `Summary.xml`:
///
///   <CoverageReport scope="Widgets.Widget">
///     <Assembly name="Widgets">
///       <Class name="Widgets.Widget">
///         <File name="C:\src\Widget.cs">
///           <LineAnalysis line="1" visits="0" coverage="NotCoverable"
///                         content="using System;"/>
///           <LineAnalysis line="2" visits="3" coverage="Covered"
///                         content="    Spin();"/>
///         </File>
///       </Class>
///     </Assembly>
///   </CoverageReport>
///
/// Each `LineAnalysis` also carries the source line, so records come back
/// with their source attached. Partial classes spread one file across
/// several documents; those are merged.
use std::collections::{BTreeMap, HashMap};

use super::{coverage_array, parse_line, parse_number, XmlDocuments};
use crate::error::Result;
use crate::model::FileCoverageData;

#[derive(Default)]
struct FileLines {
    hits: BTreeMap<u32, i64>,
    content: BTreeMap<u32, String>,
}

pub fn parse(documents: &XmlDocuments) -> Result<Vec<FileCoverageData>> {
    let mut order: Vec<String> = Vec::new();
    let mut files: HashMap<String, FileLines> = HashMap::new();

    for document in documents.values() {
        for file in document.root().descendants_named("File") {
            let Some(path) = file.attr("name") else {
                continue;
            };
            if !files.contains_key(path) {
                order.push(path.to_string());
            }
            let entry = files.entry(path.to_string()).or_default();

            for analysis in file.children_named("LineAnalysis") {
                let line = parse_line(analysis.attr("line").unwrap_or("0"), "line")?;
                if line == 0 {
                    continue;
                }
                if let Some(content) = analysis.attr("content") {
                    entry.content.insert(line, content.to_string());
                }
                if analysis.attr("coverage") == Some("NotCoverable") {
                    continue;
                }
                let visits: i64 = parse_number(analysis.attr("visits").unwrap_or("0"), "visits")?;
                entry
                    .hits
                    .entry(line)
                    .and_modify(|h| *h = (*h).max(visits))
                    .or_insert(visits);
            }
        }
    }

    Ok(order
        .into_iter()
        .map(|path| {
            let lines = files.remove(&path).unwrap_or_default();
            let coverage = coverage_array(&lines.hits);
            let data = FileCoverageData::new(path, coverage);
            if lines.content.is_empty() {
                return data;
            }
            let len = lines.content.keys().next_back().copied().unwrap_or(0) as usize;
            let mut source = vec![String::new(); len];
            for (line, text) in lines.content {
                source[line as usize - 1] = text;
            }
            data.with_source(source)
        })
        .collect())
}
