use serde::{Deserialize, Serialize};

/// One candidate/incumbent record retrieved from the database. Immutable once
/// fetched; the matcher only ever borrows these.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CanonicalRecord {
    pub candidate_id: i64,
    pub name: Option<String>,
    pub office: Option<String>,
    pub jurisdiction: Option<String>,
    pub election_year: Option<i32>,
}

/// Which canonical population a run reconciles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryForm {
    Incumbent,
    Candidate,
}

impl QueryForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incumbent => "incumbent",
            Self::Candidate => "candidate",
        }
    }
}

impl std::fmt::Display for QueryForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized identity key used for exact and fuzzy lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(key: String) -> Self {
        Self(key)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only summary of an imported worksheet, recomputed whenever the
/// column set changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetInfo {
    pub number_of_columns: usize,
    pub number_of_rows: usize,
    pub columns_added: usize,
    pub columns_not_required: Vec<String>,
}
