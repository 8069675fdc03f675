/// Parser for OpenCover XML reports.
///
/// OpenCover XML structure:
///   <CoverageSession>
///     <Modules>
///       <Module [skippedDueTo="..."]>
///         <Files><File uid="1" fullPath="C:\src\Foo.cs"/></Files>
///         <Classes><Class><Methods><Method>
///           <FileRef uid="1"/>
///           <SequencePoints>
///             <SequencePoint vc="3" sl="10" el="10" fileid="1"/>
///           </SequencePoints>
///         </Method></Methods></Class></Classes>
///       </Module>
///     </Modules>
///   </CoverageSession>
///
/// File uids are only unique within a module.
use std::collections::HashMap;

use super::{parse_line, parse_number, FileHits};
use crate::error::Result;
use crate::model::FileCoverageData;
use crate::xml::XmlDocument;

pub fn parse(document: &XmlDocument) -> Result<Vec<FileCoverageData>> {
    let mut hits = FileHits::default();

    for module in document.root().descendants_named("Module") {
        if module.attr("skippedDueTo").is_some() {
            continue;
        }

        let files: HashMap<&str, &str> = module
            .descendants_named("File")
            .into_iter()
            .filter_map(|f| Some((f.attr("uid")?, f.attr("fullPath")?)))
            .collect();

        for method in module.descendants_named("Method") {
            if let Some(path) = method
                .child("FileRef")
                .and_then(|r| r.attr("uid"))
                .and_then(|uid| files.get(uid))
            {
                hits.touch(path);
            }

            for point in method.descendants_named("SequencePoint") {
                let Some(path) = point.attr("fileid").and_then(|id| files.get(id)) else {
                    continue;
                };
                let line = parse_line(point.attr("sl").unwrap_or("0"), "sequence point line")?;
                let visits: i64 = parse_number(point.attr("vc").unwrap_or("0"), "visit count")?;
                hits.record(path, line, visits);
            }
        }
    }

    Ok(hits.into_files())
}
