use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConfig {
    pub fn to_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

use crate::error::ConfigError;

/// Tunables for the fuzzy resolution phase. Thresholds are similarity
/// fractions in [0, 1]; a candidate must clear `threshold` and beat the
/// runner-up by at least `margin` to be accepted without review.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct MatcherConfig {
    pub threshold: f64,
    pub margin: f64,
    pub max_candidates: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.90,
            margin: 0.05,
            max_candidates: 5,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ExportConfig {
    pub out_path: Option<String>,
    pub format: Option<String>, // csv|xlsx|both
    pub harvest_path: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_path: None,
            format: Some("csv".into()),
            harvest_path: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.host",
            });
        }
        if self.database.username.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.username",
            });
        }
        if self.database.database.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.database",
            });
        }
        if self.database.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.port",
                reason: "must be non-zero".into(),
            });
        }
        if let Some(ref fmt) = self.export.format {
            match fmt.as_str() {
                "csv" | "xlsx" | "both" => {}
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "export.format",
                        reason: format!("unsupported: {}", other),
                    });
                }
            }
        }
        if !(0.0..=1.0).contains(&self.matcher.threshold) {
            return Err(ConfigError::InvalidValue {
                field: "matcher.threshold",
                reason: format!("{} not in 0..=1", self.matcher.threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.matcher.margin) {
            return Err(ConfigError::InvalidValue {
                field: "matcher.margin",
                reason: format!("{} not in 0..=1", self.matcher.margin),
            });
        }
        if self.matcher.max_candidates == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matcher.max_candidates",
                reason: "must be > 0".into(),
            });
        }
        Ok(())
    }
}
