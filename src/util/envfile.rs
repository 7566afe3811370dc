use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parse key/value pairs from a .env file in the current working directory,
/// if present. Does not modify the process environment.
pub fn parse_env_file() -> Result<std::collections::HashMap<String, String>> {
    let path = Path::new(".env");
    let mut map = std::collections::HashMap::new();
    if !path.exists() {
        return Ok(map);
    }
    let content = fs::read_to_string(path)?;
    for (idx, line) in content.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        if let Some(eq) = s.find('=') {
            let key = s[..eq].trim();
            let mut val = s[eq + 1..].to_string();
            if (val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\''))
            {
                val = val[1..val.len() - 1].to_string();
            }
            map.insert(key.to_string(), val);
        } else {
            log::warn!("ignoring .env line {} without '=': {}", idx + 1, line);
        }
    }
    Ok(map)
}

/// Load `.env` into the process environment without overriding variables
/// that are already set.
pub fn load_dotenv_if_present() -> Result<()> {
    if let Ok(map) = parse_env_file() {
        for (k, v) in map {
            if std::env::var_os(&k).is_none() {
                std::env::set_var(&k, &v);
            }
        }
    }
    Ok(())
}

/// Generate a .env.template file with placeholder values and comments.
pub fn write_env_template(path: &str) -> Result<()> {
    let mut f = fs::File::create(path)?;
    let template = r#"# rating_matcher environment configuration template
# Copy this file to .env and fill in your database connection settings.
# Any of these variables can also be provided via the system environment.

DB_HOST=127.0.0.1
DB_PORT=5432
DB_USER=votesmart
DB_PASSWORD=secret
DB_NAME=votesmart

# Connection pool tuning (optional)
#RATING_MATCHER_POOL_SIZE=4
#RATING_MATCHER_ACQUIRE_MS=30000
"#;
    f.write_all(template.as_bytes())?;
    Ok(())
}
