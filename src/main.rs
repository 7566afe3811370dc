use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use std::collections::HashSet;

mod cli;
mod config;
mod db;
mod error;
mod export;
mod harvest;
mod matching;
mod models;
mod normalize;
mod util;
mod worksheet;

use crate::cli::{Cli, FormatOpt};
use crate::db::{fetch_canonical_records, get_record_count, make_pool};
use crate::export::{export_merged_csv, export_merged_xlsx, export_summary_csv};
use crate::matching::{classify_rows, report, RecordIndex};
use crate::util::envfile::{load_dotenv_if_present, write_env_template};
use crate::worksheet::Worksheet;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    load_dotenv_if_present()?;

    // Utility subcommand: generate .env.template
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("env-template") {
        let path = args
            .get(2)
            .cloned()
            .unwrap_or_else(|| ".env.template".to_string());
        write_env_template(&path)?;
        println!("Wrote {}. Copy to .env and edit values as needed.", path);
        return Ok(());
    }

    let cli = Cli::parse();
    let cfg = cli.to_app_config()?;
    let run_start_utc = chrono::Utc::now();
    let matcher_cfg = cfg.matcher.clone();
    let form: models::QueryForm = cli.form.into();

    // Import and shape the worksheet; schema violations are fatal here,
    // before any matching attempt.
    info!("Importing worksheet {}", cli.worksheet);
    let mut ws = Worksheet::read_csv(&cli.worksheet)?;
    let info = ws.analyze();
    info!(
        "Worksheet summary: {} columns, {} rows, {} added, not required: [{}]",
        info.number_of_columns,
        info.number_of_rows,
        info.columns_added,
        info.columns_not_required.join(", ")
    );

    // Column-retention decision from the CLI boundary.
    if !info.columns_not_required.is_empty() && !cli.keep_all_columns {
        let selected: HashSet<String> = cli.keep_columns.iter().cloned().collect();
        for col in &selected {
            if !info.columns_not_required.contains(col) {
                warn!("--keep-column {} is not a not-required column; ignored", col);
            }
        }
        ws.retain_columns(&selected);
        let info = ws.analyze();
        info!(
            "Columns retained: {} remain ({} not required)",
            info.number_of_columns,
            info.columns_not_required.len()
        );
    }

    info!(
        "Connecting to PostgreSQL at {}:{} / db {}",
        cfg.database.host, cfg.database.port, cfg.database.database
    );
    let pool = make_pool(&cfg.database).await?;
    let expected = get_record_count(&pool, form, cli.cycle).await?;
    info!("{} {} records available for cycle {}", expected, form, cli.cycle);
    let records = fetch_canonical_records(&pool, form, cli.cycle).await?;

    let index = RecordIndex::build(&records);
    let outcomes = classify_rows(&ws, &index, &matcher_cfg);
    let report = report::build(&outcomes, &ws);

    info!("Match Results");
    info!("  Match Score:      {}%", report.score);
    info!("  Duplicate Rows:   {}", report.duplicates);
    info!("  Unmatched Rows:   {}", report.unmatched);
    info!("  Rows Need Review: {}", report.review);

    let out_path = cli.out_path.clone();
    match cli.format {
        FormatOpt::Csv => export_merged_csv(&report.merged, &out_path)?,
        FormatOpt::Xlsx => export_merged_xlsx(&report.merged, &report, &out_path)?,
        FormatOpt::Both => {
            export_merged_csv(&report.merged, &out_path)?;
            let xlsx_path = format!("{}.xlsx", out_path.trim_end_matches(".csv"));
            export_merged_xlsx(&report.merged, &report, &xlsx_path)?;
        }
    }
    info!("Merged table written to {}", out_path);

    let summary_path = if out_path.to_ascii_lowercase().ends_with(".csv") {
        format!("{}_summary.csv", out_path.trim_end_matches(".csv"))
    } else {
        format!("{}.summary.csv", out_path)
    };
    export_summary_csv(&report, run_start_utc, &summary_path)?;
    info!("Summary written to {}", summary_path);

    if report.is_clean() {
        info!("Matches are free of errors; dataset is final");
        if let Some(harvest_path) = &cli.harvest {
            harvest::generate_harvest(&report, harvest_path)
                .context("generating harvest file")?;
        }
    } else {
        warn!("Incomplete matches detected; review the merged export before harvesting");
        if cli.harvest.is_some() {
            warn!("Skipping harvest generation: run is not clean");
        }
    }

    Ok(())
}
