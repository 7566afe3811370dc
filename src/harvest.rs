use std::fs::File;
use std::io::BufWriter;

use anyhow::Result;
use csv::WriterBuilder;

use crate::error::ExportError;
use crate::export::csv_export::ensure_parent_dir;
use crate::matching::report::MatchReport;
use crate::worksheet::{CANDIDATE_ID_COLUMN, RATING_COLUMN};

/// Generate the downstream harvest file from a reconciled dataset: canonical
/// identifier plus rating, one line per matched row. Refuses anything but a
/// clean run. Rows without a canonical identifier are skipped: score rounding
/// can report 100 on a large worksheet that still carries an unmatched row,
/// and harvest consumes only fully-matched rows.
pub fn generate_harvest(report: &MatchReport, path: &str) -> Result<()> {
    if !report.is_clean() {
        return Err(ExportError::NotClean {
            score: report.score,
            duplicates: report.duplicates,
            review: report.review,
        }
        .into());
    }

    let merged = &report.merged;
    let id_col = merged
        .columns
        .iter()
        .position(|c| c == CANDIDATE_ID_COLUMN)
        .ok_or_else(|| ExportError::Csv("merged table lacks candidate_id column".into()))?;
    let rating_col = merged
        .columns
        .iter()
        .position(|c| c == RATING_COLUMN)
        .ok_or_else(|| ExportError::Csv("merged table lacks rating column".into()))?;

    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    let mut w = WriterBuilder::new().from_writer(BufWriter::new(file));
    w.write_record([CANDIDATE_ID_COLUMN, RATING_COLUMN])?;
    let mut emitted = 0usize;
    for row in &merged.rows {
        if row[id_col].is_empty() {
            log::warn!("skipping harvest row with no canonical identifier");
            continue;
        }
        w.write_record([row[id_col].as_str(), row[rating_col].as_str()])?;
        emitted += 1;
    }
    w.flush()?;
    log::info!("Harvest written: {} rows to {}", emitted, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::report::MergedTable;

    fn report(clean: bool) -> MatchReport {
        MatchReport {
            score: if clean { 100 } else { 50 },
            duplicates: 0,
            unmatched: if clean { 0 } else { 1 },
            review: 0,
            merged: MergedTable {
                columns: vec![
                    "name".into(),
                    "rating".into(),
                    "candidate_id".into(),
                ],
                rows: vec![vec!["Ann Lee".into(), "95".into(), "42".into()]],
            },
        }
    }

    #[test]
    fn clean_run_emits_harvest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.csv");
        generate_harvest(&report(true), path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("candidate_id,rating"));
        assert!(content.contains("42,95"));
    }

    #[test]
    fn rounding_to_100_does_not_leak_unmatched_rows() {
        // 249 matched out of 250 rounds to a score of 100, so the clean gate
        // passes; the single unmatched row must still stay out of the file.
        let mut rows: Vec<Vec<String>> = (0..249)
            .map(|i| vec![format!("Person {}", i), "80".into(), (i + 1).to_string()])
            .collect();
        rows.push(vec!["Stray Row".into(), "70".into(), String::new()]);
        let report = MatchReport {
            score: 100,
            duplicates: 0,
            unmatched: 1,
            review: 0,
            merged: MergedTable {
                columns: vec![
                    "name".into(),
                    "rating".into(),
                    "candidate_id".into(),
                ],
                rows,
            },
        };
        assert!(report.is_clean());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.csv");
        generate_harvest(&report, path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let data_lines: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(data_lines.len(), 249);
        assert!(data_lines.iter().all(|l| !l.starts_with(',')));
    }

    #[test]
    fn dirty_run_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.csv");
        let err = generate_harvest(&report(false), path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("clean run"));
        assert!(!path.exists());
    }
}
