use std::fs::File;
use std::io::BufWriter;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;

use crate::matching::report::{MatchReport, MergedTable};

/// Write the merged table to CSV, worksheet order preserved.
pub fn export_merged_csv(merged: &MergedTable, path: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    let buf_writer = BufWriter::with_capacity(512 * 1024, file);
    let mut w = WriterBuilder::new().from_writer(buf_writer);
    w.write_record(&merged.columns)?;
    for row in &merged.rows {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Write the match summary (score, outcome counts, run window) alongside an
/// export.
pub fn export_summary_csv(
    report: &MatchReport,
    started_utc: DateTime<Utc>,
    path: &str,
) -> Result<()> {
    ensure_parent_dir(path)?;
    let ended_utc = Utc::now();
    let duration_secs = (ended_utc - started_utc).num_milliseconds() as f64 / 1000.0;
    let file = File::create(path)?;
    let mut w = WriterBuilder::new().from_writer(BufWriter::new(file));
    w.write_record(["Metric", "Value"])?;
    w.write_record(["Match Score", format!("{}%", report.score).as_str()])?;
    w.write_record(["Duplicate Rows", report.duplicates.to_string().as_str()])?;
    w.write_record(["Unmatched Rows", report.unmatched.to_string().as_str()])?;
    w.write_record(["Rows Need Review", report.review.to_string().as_str()])?;
    w.write_record(["Started (UTC)", started_utc.to_rfc3339().as_str()])?;
    w.write_record(["Ended (UTC)", ended_utc.to_rfc3339().as_str()])?;
    w.write_record(["Duration (s)", format!("{:.3}", duration_secs).as_str()])?;
    w.flush()?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &str) -> Result<()> {
    let p = std::path::Path::new(path);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged() -> MergedTable {
        MergedTable {
            columns: vec![
                "name".into(),
                "jurisdiction".into(),
                "office".into(),
                "rating".into(),
                "candidate_id".into(),
            ],
            rows: vec![
                vec![
                    "Ann Lee".into(),
                    "TX".into(),
                    "Governor".into(),
                    "95".into(),
                    "42".into(),
                ],
                vec![
                    "Bob Diaz".into(),
                    "NM".into(),
                    "Senator".into(),
                    "70".into(),
                    "".into(),
                ],
            ],
        }
    }

    #[test]
    fn merged_csv_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        export_merged_csv(&merged(), path.to_str().unwrap()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers[4], "candidate_id");
        let rows: Vec<csv::StringRecord> =
            rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][4], "42");
        assert_eq!(&rows[1][4], "");
    }

    #[test]
    fn summary_csv_lists_all_metrics() {
        let report = MatchReport {
            score: 67,
            duplicates: 0,
            unmatched: 1,
            review: 0,
            merged: merged(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        export_summary_csv(&report, Utc::now(), path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Match Score,67%"));
        assert!(content.contains("Unmatched Rows,1"));
        assert!(content.contains("Duration (s)"));
    }
}
