use clap::{Parser, ValueEnum};

use crate::config::{AppConfig, DatabaseConfig, ExportConfig, MatcherConfig};
use crate::error::ConfigError;
use crate::models::QueryForm;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, ValueEnum, Debug)]
pub enum FormatOpt {
    Csv,
    Xlsx,
    Both,
}

impl FormatOpt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for FormatOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum, Debug)]
pub enum FormOpt {
    Incumbent,
    Candidate,
}

impl std::fmt::Display for FormOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incumbent => f.write_str("incumbent"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

impl From<FormOpt> for QueryForm {
    fn from(f: FormOpt) -> Self {
        match f {
            FormOpt::Incumbent => QueryForm::Incumbent,
            FormOpt::Candidate => QueryForm::Candidate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "rating_matcher",
    version,
    about = "Reconcile a rating worksheet against canonical candidate/incumbent records",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Path to the rating worksheet CSV
    #[arg(value_name = "WORKSHEET")]
    pub worksheet: String,
    /// Output path for the merged table
    #[arg(value_name = "OUT_PATH")]
    pub out_path: String,
    /// Are these ratings for incumbents or candidates?
    #[arg(long = "form", value_enum, default_value_t = FormOpt::Incumbent)]
    pub form: FormOpt,
    /// Election cycle to query canonical records for
    #[arg(long = "cycle", value_name = "YEAR")]
    pub cycle: i32,
    /// Output format
    #[arg(long = "format", default_value_t = FormatOpt::Csv)]
    pub format: FormatOpt,
    /// Not-required columns to keep (repeatable); omit to discard all,
    /// pass --keep-all-columns to keep everything
    #[arg(long = "keep-column", value_name = "COLUMN")]
    pub keep_columns: Vec<String>,
    /// Keep every not-required column
    #[arg(long = "keep-all-columns")]
    pub keep_all_columns: bool,
    /// Harvest output path; written only when the run is clean
    #[arg(long = "harvest", value_name = "PATH")]
    pub harvest: Option<String>,
    /// Fuzzy similarity threshold (0..=1)
    #[arg(long = "threshold", value_name = "T", default_value_t = 0.90)]
    pub threshold: f64,
    /// Ambiguity margin over the runner-up (0..=1)
    #[arg(long = "margin", value_name = "M", default_value_t = 0.05)]
    pub margin: f64,
    /// Maximum fuzzy candidates to consider per row
    #[arg(long = "max-candidates", value_name = "N", default_value_t = 5)]
    pub max_candidates: usize,
    /// DB host (env: DB_HOST)
    #[arg(long = "db-host", env = "DB_HOST")]
    pub db_host: String,
    /// DB port (env: DB_PORT)
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,
    /// DB user (env: DB_USER)
    #[arg(long = "db-user", env = "DB_USER")]
    pub db_user: String,
    /// DB password (env: DB_PASSWORD)
    #[arg(long = "db-password", env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,
    /// Database name (env: DB_NAME)
    #[arg(long = "db-name", env = "DB_NAME")]
    pub db_name: String,
}

impl Cli {
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        let cfg = AppConfig {
            database: DatabaseConfig {
                username: self.db_user.clone(),
                password: self.db_password.clone(),
                host: self.db_host.clone(),
                port: self.db_port,
                database: self.db_name.clone(),
            },
            matcher: MatcherConfig {
                threshold: self.threshold,
                margin: self.margin,
                max_candidates: self.max_candidates,
            },
            export: ExportConfig {
                out_path: Some(self.out_path.clone()),
                format: Some(self.format.as_str().into()),
                harvest_path: self.harvest.clone(),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_and_validates() {
        let cli = Cli::parse_from([
            "rating_matcher",
            "sheet.csv",
            "out.csv",
            "--cycle",
            "2024",
            "--db-host",
            "127.0.0.1",
            "--db-user",
            "vs",
            "--db-password",
            "pw",
            "--db-name",
            "votesmart",
        ]);
        let cfg = cli.to_app_config().unwrap();
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.matcher.threshold, 0.90);
        assert_eq!(cfg.export.format.as_deref(), Some("csv"));
    }

    #[test]
    fn bad_threshold_rejected_by_validate() {
        let cli = Cli::parse_from([
            "rating_matcher",
            "sheet.csv",
            "out.csv",
            "--cycle",
            "2024",
            "--threshold",
            "1.5",
            "--db-host",
            "h",
            "--db-user",
            "u",
            "--db-password",
            "p",
            "--db-name",
            "d",
        ]);
        assert!(cli.to_app_config().is_err());
    }
}
