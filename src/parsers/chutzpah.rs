/// Parser for Chutzpah's JSON coverage output (`/coveragejson`).
///
/// The format is a JSON object keyed by file path. Each value contains:
///   - `FilePath`:            the source path
///   - `LineExecutionCounts`: `[null, 1, 0, null, ...]`; index 0 is a
///                            placeholder, index `n` is line `n`
///   - `SourceLines`:         optional source text, one entry per line
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::Deserialize;

use crate::error::Result;
use crate::model::{FileCoverageData, LineHits};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChutzpahFile {
    file_path: String,
    #[serde(default)]
    line_execution_counts: Vec<LineHits>,
    #[serde(default)]
    source_lines: Option<Vec<String>>,
}

pub fn parse(lines: &[String]) -> Result<Vec<FileCoverageData>> {
    let json = lines.join("\n");
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut deser = serde_json::Deserializer::from_str(&json);
    let entries = serde::Deserializer::deserialize_map(&mut deser, EntriesVisitor)?;
    deser.end()?;

    Ok(entries
        .into_iter()
        .map(|file| {
            let coverage = file.line_execution_counts.into_iter().skip(1).collect();
            let data = FileCoverageData::new(file.file_path, coverage);
            match file.source_lines {
                Some(source) if !source.is_empty() => data.with_source(source),
                _ => data,
            }
        })
        .collect())
}

/// Walks the top-level `{ key: entry }` object keeping document order.
struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Vec<ChutzpahFile>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a Chutzpah coverage object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some((_key, file)) = map.next_entry::<String, ChutzpahFile>()? {
            entries.push(file);
        }
        Ok(entries)
    }
}
