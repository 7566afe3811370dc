use crate::matching::MatchOutcome;
use crate::worksheet::{Worksheet, CANDIDATE_ID_COLUMN};

/// The merged output table: the worksheet's columns with the canonical
/// identifier filled in for cleanly matched rows, original row order kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Aggregate outcome of a match run.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Percentage of rows cleanly matched, rounded to the nearest integer.
    /// A zero-row worksheet is vacuously fully matched (100).
    pub score: u8,
    pub duplicates: usize,
    pub unmatched: usize,
    pub review: usize,
    pub merged: MergedTable,
}

impl MatchReport {
    /// The sole condition under which the dataset is final and safe to hand
    /// to harvest generation.
    pub fn is_clean(&self) -> bool {
        self.score == 100 && self.duplicates == 0 && self.review == 0
    }
}

pub fn build(outcomes: &[MatchOutcome], worksheet: &Worksheet) -> MatchReport {
    debug_assert_eq!(outcomes.len(), worksheet.row_count());

    let mut matched = 0usize;
    let mut duplicates = 0usize;
    let mut unmatched = 0usize;
    let mut review = 0usize;
    for o in outcomes {
        match o {
            MatchOutcome::Matched { .. } => matched += 1,
            MatchOutcome::Duplicate { .. } => duplicates += 1,
            MatchOutcome::Unmatched => unmatched += 1,
            MatchOutcome::NeedsReview { .. } => review += 1,
        }
    }

    let score = if outcomes.is_empty() {
        100
    } else {
        (100.0 * matched as f64 / outcomes.len() as f64).round() as u8
    };

    let columns = worksheet.columns().to_vec();
    let id_col = worksheet.col_idx(CANDIDATE_ID_COLUMN);
    let rows = worksheet
        .rows()
        .iter()
        .zip(outcomes)
        .map(|(row, outcome)| {
            let mut row = row.clone();
            if let (Some(ci), MatchOutcome::Matched { record_id }) = (id_col, outcome) {
                row[ci] = record_id.to_string();
            }
            row
        })
        .collect();

    MatchReport {
        score,
        duplicates,
        unmatched,
        review,
        merged: MergedTable { columns, rows },
    }
}
