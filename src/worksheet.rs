use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::WorksheetError;
use crate::models::{Fingerprint, WorksheetInfo};
use crate::normalize::fingerprint;

/// Identity columns feeding the fingerprint. Missing any of these after
/// import is fatal to the run.
pub const IDENTITY_COLUMNS: [&str; 3] = ["name", "jurisdiction", "office"];

/// Score column carried through to the merged table and harvest.
pub const RATING_COLUMN: &str = "rating";

/// Column auto-added on import to receive the matched canonical identifier.
pub const CANDIDATE_ID_COLUMN: &str = "candidate_id";

/// An imported rating worksheet: ordered columns, ordered string rows.
/// Mutated only by column-retention decisions between import and matching.
#[derive(Debug, Clone)]
pub struct Worksheet {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    added: Vec<String>,
}

impl Worksheet {
    /// Shape a raw imported table into a worksheet. Header names are
    /// case-folded and trimmed; the canonical-identifier column is appended
    /// empty when absent and tracked as an added column.
    pub fn from_table(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, WorksheetError> {
        let columns: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(WorksheetError::RaggedRow {
                    row: i + 1,
                    got: row.len(),
                    expected: columns.len(),
                });
            }
        }

        let missing: Vec<&str> = IDENTITY_COLUMNS
            .iter()
            .chain(std::iter::once(&RATING_COLUMN))
            .filter(|c| !columns.iter().any(|h| h == *c))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(WorksheetError::Schema(missing.join(", ")));
        }

        let mut ws = Self {
            columns,
            rows,
            added: Vec::new(),
        };
        if ws.col_idx(CANDIDATE_ID_COLUMN).is_none() {
            ws.columns.push(CANDIDATE_ID_COLUMN.to_string());
            for row in &mut ws.rows {
                row.push(String::new());
            }
            ws.added.push(CANDIDATE_ID_COLUMN.to_string());
        }
        Ok(ws)
    }

    /// Read a worksheet from a CSV file.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(false)
            .from_path(path)
            .with_context(|| format!("opening worksheet {}", path.display()))?;
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| WorksheetError::Read(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(|e| WorksheetError::Read(e.to_string()))?;
            rows.push(rec.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self::from_table(headers, rows)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_idx(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let ci = self.col_idx(column)?;
        self.rows.get(row).map(|r| r[ci].as_str())
    }

    fn is_required(name: &str) -> bool {
        IDENTITY_COLUMNS.contains(&name)
            || name == RATING_COLUMN
            || name == CANDIDATE_ID_COLUMN
    }

    /// Columns the matcher does not need; candidates for user retention.
    pub fn not_required_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !Self::is_required(c))
            .cloned()
            .collect()
    }

    /// Summary of the current column set.
    pub fn analyze(&self) -> WorksheetInfo {
        WorksheetInfo {
            number_of_columns: self.columns.len(),
            number_of_rows: self.rows.len(),
            columns_added: self.added.len(),
            columns_not_required: self.not_required_columns(),
        }
    }

    /// Drop every not-required column except `selected`. Idempotent: an empty
    /// set discards all optional columns, the full set keeps everything.
    pub fn retain_columns(&mut self, selected: &HashSet<String>) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| Self::is_required(c) || selected.contains(c))
            .collect();
        if keep.iter().all(|&k| k) {
            return;
        }
        self.columns = self
            .columns
            .iter()
            .zip(&keep)
            .filter(|(_, &k)| k)
            .map(|(c, _)| c.clone())
            .collect();
        for row in &mut self.rows {
            *row = row
                .iter()
                .zip(&keep)
                .filter(|(_, &k)| k)
                .map(|(c, _)| c.clone())
                .collect();
        }
    }

    /// Identity fingerprint for one row.
    pub fn fingerprint_row(&self, row: usize) -> Fingerprint {
        fingerprint(
            self.cell(row, "name").unwrap_or(""),
            self.cell(row, "jurisdiction").unwrap_or(""),
            self.cell(row, "office").unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(extra: &[&str]) -> Worksheet {
        let mut headers = vec![
            "Name".to_string(),
            "Jurisdiction".to_string(),
            "Office".to_string(),
            "Rating".to_string(),
        ];
        headers.extend(extra.iter().map(|s| s.to_string()));
        let row: Vec<String> = (0..headers.len()).map(|i| format!("v{}", i)).collect();
        Worksheet::from_table(headers, vec![row]).unwrap()
    }

    #[test]
    fn missing_identity_column_is_schema_error() {
        let headers = vec!["name".to_string(), "rating".to_string()];
        let err = Worksheet::from_table(headers, vec![]).unwrap_err();
        match err {
            WorksheetError::Schema(cols) => {
                assert!(cols.contains("jurisdiction"));
                assert!(cols.contains("office"));
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_rejected() {
        let headers = vec![
            "name".into(),
            "jurisdiction".into(),
            "office".into(),
            "rating".into(),
        ];
        let err = Worksheet::from_table(headers, vec![vec!["a".into()]]).unwrap_err();
        assert!(matches!(err, WorksheetError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn candidate_id_auto_added_and_counted() {
        let ws = sheet(&[]);
        assert!(ws.col_idx(CANDIDATE_ID_COLUMN).is_some());
        let info = ws.analyze();
        assert_eq!(info.columns_added, 1);
        assert_eq!(info.number_of_columns, 5);
        assert_eq!(info.number_of_rows, 1);
        assert!(info.columns_not_required.is_empty());
    }

    #[test]
    fn not_required_partition() {
        let ws = sheet(&["notes", "sig_year"]);
        assert_eq!(
            ws.not_required_columns(),
            vec!["notes".to_string(), "sig_year".to_string()]
        );
    }

    #[test]
    fn retain_columns_empty_set_discards_all_optional() {
        let mut ws = sheet(&["notes", "sig_year"]);
        ws.retain_columns(&HashSet::new());
        assert!(ws.not_required_columns().is_empty());
        assert_eq!(ws.columns().len(), 5);
        assert_eq!(ws.rows()[0].len(), 5);
    }

    #[test]
    fn retain_columns_full_set_keeps_everything() {
        let mut ws = sheet(&["notes", "sig_year"]);
        let all: HashSet<String> = ws.not_required_columns().into_iter().collect();
        ws.retain_columns(&all);
        assert_eq!(ws.not_required_columns().len(), 2);
    }

    #[test]
    fn retain_columns_is_idempotent() {
        let mut ws = sheet(&["notes", "sig_year"]);
        let sel: HashSet<String> = ["notes".to_string()].into_iter().collect();
        ws.retain_columns(&sel);
        let once = ws.columns().to_vec();
        ws.retain_columns(&sel);
        assert_eq!(ws.columns(), once.as_slice());
    }

    #[test]
    fn fingerprint_row_uses_identity_cells() {
        let headers = vec![
            "name".into(),
            "jurisdiction".into(),
            "office".into(),
            "rating".into(),
        ];
        let rows = vec![vec![
            "  Ann  LEE ".into(),
            "TX".into(),
            "Governor".into(),
            "95".into(),
        ]];
        let ws = Worksheet::from_table(headers, rows).unwrap();
        assert_eq!(ws.fingerprint_row(0).as_str(), "ann lee|tx|governor");
    }
}
