use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{CanonicalRecord, QueryForm};

// Incumbents are keyed by the office they currently hold; candidates by the
// office they are running for in the given cycle.
const INCUMBENT_SQL: &str = r#"
SELECT c.candidate_id,
       TRIM(CONCAT(c.first_name, ' ', c.last_name)) AS name,
       o.title       AS office,
       s.abbreviation AS jurisdiction,
       i.election_year
FROM candidate c
JOIN incumbency i ON i.candidate_id = c.candidate_id
JOIN office o     ON o.office_id = i.office_id
JOIN state s      ON s.state_id = i.state_id
WHERE i.election_year = $1
"#;

const CANDIDATE_SQL: &str = r#"
SELECT c.candidate_id,
       TRIM(CONCAT(c.first_name, ' ', c.last_name)) AS name,
       o.title       AS office,
       s.abbreviation AS jurisdiction,
       e.election_year
FROM candidate c
JOIN candidacy e  ON e.candidate_id = c.candidate_id
JOIN office o     ON o.office_id = e.office_id
JOIN state s      ON s.state_id = e.state_id
WHERE e.election_year = $1
"#;

/// Fetch the canonical record set for one run. The result is unordered from
/// the engine's point of view; the index preserves whatever order arrives.
pub async fn fetch_canonical_records(
    pool: &PgPool,
    form: QueryForm,
    election_year: i32,
) -> Result<Vec<CanonicalRecord>> {
    let sql = match form {
        QueryForm::Incumbent => INCUMBENT_SQL,
        QueryForm::Candidate => CANDIDATE_SQL,
    };
    let records = sqlx::query_as::<_, CanonicalRecord>(sql)
        .bind(election_year)
        .fetch_all(pool)
        .await
        .with_context(|| format!("fetching {} records for {}", form, election_year))?;
    log::info!("Fetched {} {} records", records.len(), form);
    Ok(records)
}

pub async fn get_record_count(
    pool: &PgPool,
    form: QueryForm,
    election_year: i32,
) -> Result<i64> {
    let sql = match form {
        QueryForm::Incumbent => {
            "SELECT COUNT(*) FROM incumbency WHERE election_year = $1"
        }
        QueryForm::Candidate => {
            "SELECT COUNT(*) FROM candidacy WHERE election_year = $1"
        }
    };
    let (count,): (i64,) = sqlx::query_as(sql)
        .bind(election_year)
        .fetch_one(pool)
        .await
        .context("counting canonical records")?;
    Ok(count)
}
