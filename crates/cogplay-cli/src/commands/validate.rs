//! The `cogplay validate` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use cogplay_core::history;

pub fn execute(history_path: PathBuf) -> Result<()> {
    let records = history::load_history_path(&history_path)?;
    println!("History: {} ({} records)", history_path.display(), records.len());

    let warnings = history::validate_history(&records, Utc::now());
    for w in &warnings {
        let record = &records[w.index];
        println!(
            "  [#{} {} {}] WARNING: {}",
            w.index,
            record.game_type,
            record.created_at.format("%Y-%m-%d"),
            w.message
        );
    }

    if warnings.is_empty() {
        println!("All records valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
