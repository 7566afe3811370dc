use std::collections::HashMap;

use log::{debug, warn};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::config::MatcherConfig;
use crate::models::{CanonicalRecord, Fingerprint};
use crate::normalize::fingerprint_record;
use crate::worksheet::Worksheet;

pub mod report;

/// Final classification of one worksheet row. Ambiguity and absence are
/// outcomes here, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A single canonical record was chosen.
    Matched { record_id: i64 },
    /// More than one row resolved to the same canonical record; `siblings`
    /// are the other row indices sharing it.
    Duplicate {
        record_id: i64,
        siblings: Vec<usize>,
    },
    /// No canonical record cleared the threshold.
    Unmatched,
    /// Multiple plausible records tied or fell within the ambiguity margin.
    NeedsReview { candidates: Vec<i64> },
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Blended string similarity in [0, 1]. Jaro-Winkler dominates because it is
/// the stronger signal for name typos; Levenshtein anchors longer edits.
pub fn similarity(a: &str, b: &str) -> f64 {
    0.4 * normalized_levenshtein(a, b) + 0.6 * jaro_winkler(a, b)
}

/// Read-only lookup structure over the canonical record set. Built once per
/// run; borrows the records from the query layer.
pub struct RecordIndex<'a> {
    records: &'a [CanonicalRecord],
    fingerprints: Vec<Fingerprint>,
    exact: HashMap<String, Vec<usize>>,
}

impl<'a> RecordIndex<'a> {
    pub fn build(records: &'a [CanonicalRecord]) -> Self {
        if records.is_empty() {
            warn!("canonical record set is empty; every row will be unmatched");
        }
        let fingerprints: Vec<Fingerprint> =
            records.iter().map(fingerprint_record).collect();
        let mut exact: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, fp) in fingerprints.iter().enumerate() {
            exact.entry(fp.as_str().to_string()).or_default().push(i);
        }
        Self {
            records,
            fingerprints,
            exact,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, idx: usize) -> &'a CanonicalRecord {
        &self.records[idx]
    }

    /// All records whose fingerprint exactly equals the query. Indices are in
    /// canonical insertion order.
    pub fn exact_lookup(&self, fp: &Fingerprint) -> &[usize] {
        self.exact
            .get(fp.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Candidates ranked by similarity descending, truncated to
    /// `max_candidates`. The sort is stable, so ties keep canonical
    /// insertion order and the ranking is deterministic.
    pub fn fuzzy_lookup(&self, fp: &Fingerprint, max_candidates: usize) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = self
            .fingerprints
            .iter()
            .enumerate()
            .map(|(i, candidate)| (i, similarity(fp.as_str(), candidate.as_str())))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(max_candidates);
        scored
    }
}

// Per-row result of the first pass, before duplicate detection.
enum Tentative {
    Matched(usize),
    Unmatched,
    NeedsReview(Vec<usize>),
}

fn classify_row(
    fp: &Fingerprint,
    index: &RecordIndex<'_>,
    cfg: &MatcherConfig,
) -> Tentative {
    if fp.as_str().chars().all(|c| c == '|') {
        debug!("row has empty identity fields; unmatched");
        return Tentative::Unmatched;
    }
    match index.exact_lookup(fp) {
        [] => {}
        [single] => return Tentative::Matched(*single),
        many => return Tentative::NeedsReview(many.to_vec()),
    }
    let ranked = index.fuzzy_lookup(fp, cfg.max_candidates);
    let Some(&(top_idx, top_sim)) = ranked.first() else {
        return Tentative::Unmatched;
    };
    if top_sim < cfg.threshold {
        return Tentative::Unmatched;
    }
    let contenders: Vec<usize> = ranked
        .iter()
        .filter(|(_, sim)| top_sim - sim < cfg.margin)
        .map(|(i, _)| *i)
        .collect();
    if contenders.len() > 1 {
        Tentative::NeedsReview(contenders)
    } else {
        Tentative::Matched(top_idx)
    }
}

/// Classify every worksheet row into exactly one outcome: exact lookup, then
/// fuzzy resolution, then a full-assignment duplicate pass.
pub fn classify_rows(
    worksheet: &Worksheet,
    index: &RecordIndex<'_>,
    cfg: &MatcherConfig,
) -> Vec<MatchOutcome> {
    let tentative: Vec<Tentative> = (0..worksheet.row_count())
        .map(|row| classify_row(&worksheet.fingerprint_row(row), index, cfg))
        .collect();

    // Duplicate detection is a property of the full assignment: count how
    // many rows chose each canonical record before finalizing any of them.
    let mut chosen_by: HashMap<i64, Vec<usize>> = HashMap::new();
    for (row, t) in tentative.iter().enumerate() {
        if let Tentative::Matched(rec_idx) = t {
            chosen_by
                .entry(index.record(*rec_idx).candidate_id)
                .or_default()
                .push(row);
        }
    }

    tentative
        .into_iter()
        .enumerate()
        .map(|(row, t)| match t {
            Tentative::Matched(rec_idx) => {
                let record_id = index.record(rec_idx).candidate_id;
                let rows = &chosen_by[&record_id];
                if rows.len() > 1 {
                    MatchOutcome::Duplicate {
                        record_id,
                        siblings: rows.iter().copied().filter(|r| *r != row).collect(),
                    }
                } else {
                    MatchOutcome::Matched { record_id }
                }
            }
            Tentative::Unmatched => MatchOutcome::Unmatched,
            Tentative::NeedsReview(idxs) => MatchOutcome::NeedsReview {
                candidates: idxs
                    .into_iter()
                    .map(|i| index.record(i).candidate_id)
                    .collect(),
            },
        })
        .collect()
}
