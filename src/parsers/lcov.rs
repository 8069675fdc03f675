/// Parser for the LCOV `.info` format.
///
/// Reference: https://ltp.sourceforge.net/coverage/lcov/geninfo.1.php
///
/// Key records:
///   TN:<test name>
///   SF:<absolute path to source file>
///   DA:<line number>,<execution count>[,<checksum>]
///   end_of_record
///
/// Function and branch records (FN, FNDA, BRDA, ...) and the summary lines
/// (LF, LH, ...) carry nothing the line coverage array needs.
use super::{check_line, FileHits};
use crate::error::Result;
use crate::model::FileCoverageData;

pub fn parse(lines: &[String]) -> Result<Vec<FileCoverageData>> {
    let mut hits = FileHits::default();
    let mut current_file: Option<String> = None;

    for raw_line in lines {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "end_of_record" {
            current_file = None;
            continue;
        }

        // Split on first ':'
        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };

        match tag {
            "SF" => {
                hits.touch(value);
                current_file = Some(value.to_string());
            }
            "DA" => {
                // Negative counts are passed through; some instrumenters use
                // them to flag lines they could not measure.
                if let Some(file) = current_file.as_deref() {
                    let mut parts = value.splitn(3, ',');
                    let line_number = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
                    let count = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
                    if let (Some(line_number), Some(count)) = (line_number, count) {
                        hits.record(file, check_line(line_number, "DA line")?, count);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(hits.into_files())
}
