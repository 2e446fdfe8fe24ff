//! The `cogplay trend` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Table};
use serde::Serialize;

use cogplay_core::history;
use cogplay_core::model::GameKind;
use cogplay_core::statistics::{self, GameSummary, Trend, WindowStats, WindowUnit};

#[derive(Serialize)]
struct TrendReport {
    unit: WindowUnit,
    windows: Vec<WindowStats>,
    trend: Trend,
    games: Vec<GameSummary>,
}

pub fn execute(
    history_path: Option<PathBuf>,
    unit: String,
    windows: Option<usize>,
    game: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let unit: WindowUnit = unit.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    if let Some(count) = windows {
        if count > statistics::MAX_ROLLING_WINDOWS {
            anyhow::bail!(
                "--windows must be at most {}, got {count}",
                statistics::MAX_ROLLING_WINDOWS
            );
        }
    }
    let history_path = match history_path {
        Some(path) => path,
        None => cogplay_judge::load_config_from(config_path.as_deref())?.history_dir,
    };

    let mut records = history::load_history_path(&history_path)?;
    if let Some(game) = game {
        let kind: GameKind = game.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
        records.retain(|r| r.game_type.parse::<GameKind>().is_ok_and(|k| k == kind));
    }
    tracing::debug!(records = records.len(), %unit, "aggregating history");

    let window_stats = match windows {
        Some(count) => statistics::rolling(&records, unit, Utc::now(), count),
        None => statistics::aggregate(&records, unit),
    };
    let report = TrendReport {
        unit,
        trend: statistics::trend(&window_stats),
        games: statistics::summarize_by_game(&records),
        windows: window_stats,
    };

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_report(&report),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_report(report: &TrendReport) {
    if report.windows.is_empty() {
        println!("No scores recorded.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        format!("{} of", report.unit),
        "Average".to_string(),
        "Difficulty".to_string(),
        "Games".to_string(),
    ]);
    for w in &report.windows {
        table.add_row(vec![
            Cell::new(w.window_start),
            Cell::new(percent(w.average_percentage)),
            Cell::new(
                w.average_difficulty
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
            ),
            Cell::new(w.sample_count),
        ]);
    }
    println!("{table}");
    println!("Trend: {}", report.trend);

    if !report.games.is_empty() {
        let mut games = Table::new();
        games.set_header(vec!["Game", "Played", "Average", "Best", "Last played"]);
        for g in &report.games {
            games.add_row(vec![
                Cell::new(&g.game_type),
                Cell::new(g.attempts),
                Cell::new(percent(g.average_percentage)),
                Cell::new(percent(g.best_percentage)),
                Cell::new(g.last_played.format("%Y-%m-%d")),
            ]);
        }
        println!("\n{games}");
    }
}

fn percent(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |p| format!("{p}%"))
}
