use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub async fn make_pool(cfg: &DatabaseConfig) -> Result<PgPool> {
    make_pool_with_size(cfg, None).await
}

pub async fn make_pool_with_size(cfg: &DatabaseConfig, max: Option<u32>) -> Result<PgPool> {
    let url = cfg.to_url();
    let max_conn: u32 = if let Some(m) = max {
        m
    } else if let Ok(s) = std::env::var("RATING_MATCHER_POOL_SIZE") {
        match s.parse::<u32>() {
            Ok(v) if v > 0 => v,
            _ => {
                log::warn!(
                    "Invalid RATING_MATCHER_POOL_SIZE='{}'; using computed default",
                    s
                );
                compute_default_max_conns()
            }
        }
    } else {
        compute_default_max_conns()
    };
    let acquire_ms: u64 = std::env::var("RATING_MATCHER_ACQUIRE_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30_000);

    let pool = PgPoolOptions::new()
        .max_connections(max_conn)
        .acquire_timeout(Duration::from_millis(acquire_ms))
        .connect(&url)
        .await?;
    Ok(pool)
}

fn compute_default_max_conns() -> u32 {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4) as u32;
    // The run issues one bulk fetch; a small pool is plenty.
    let capped = cores.min(8).max(2);
    log::info!("DB pool sizing: cores={}, final_max={}", cores, capped);
    capped
}
