/// Parser for a MonoCov XML export directory.
///
/// The export holds `project.xml`, `namespace-*.xml` and one `class-*.xml`
/// per class. Only class documents carry line data:
///
///   <coverage>
///     <source sourceFile="/src/Widget.cs">
///       <l line="1" count="-1">using System;</l>
///       <l line="2" count="3">    Spin();</l>
///     </source>
///   </coverage>
///
/// Every `l` element is one source line. A count of `-1`, or one that does
/// not parse, marks a non-executable line.
use super::XmlDocuments;
use crate::error::Result;
use crate::model::{FileCoverageData, LineHits};

pub fn parse(documents: &XmlDocuments) -> Result<Vec<FileCoverageData>> {
    let mut files = Vec::new();

    for (name, document) in documents {
        if !name.starts_with("class-") {
            continue;
        }
        let Some(source) = document.root().descendants_named("source").into_iter().next() else {
            continue;
        };
        let Some(path) = source.attr("sourceFile") else {
            continue;
        };

        let mut coverage: Vec<LineHits> = Vec::new();
        let mut lines = Vec::new();
        for line in source.children_named("l") {
            let hits = line
                .attr("count")
                .and_then(|c| c.trim().parse::<i64>().ok())
                .filter(|&c| c != -1);
            coverage.push(hits);
            lines.push(line.text().to_string());
        }

        files.push(FileCoverageData::new(path, coverage).with_source(lines));
    }

    Ok(files)
}
