//! The `cogplay init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("cogplay.toml").exists() {
        println!("cogplay.toml already exists, skipping.");
    } else {
        std::fs::write("cogplay.toml", SAMPLE_CONFIG)?;
        println!("Created cogplay.toml");
    }

    std::fs::create_dir_all("history")?;
    let example_path = std::path::Path::new("history/example.json");
    if example_path.exists() {
        println!("history/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_HISTORY)?;
        println!("Created history/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: cogplay generate --game digit-recall > puzzle.json");
    println!("  2. Run: cogplay validate --history history");
    println!("  3. Run: cogplay trend --history history");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# cogplay configuration

default_difficulty = "medium"
reaction_duration_secs = 60
judge_parallelism = 4
history_dir = "./history"

[judge]
type = "heuristic"

# To judge then-what responses with a remote model instead:
# [judge]
# type = "remote"
# endpoint = "https://example.supabase.co/functions/v1/judge-then-what"
# api_key = "${COGPLAY_JUDGE_KEY}"
# timeout_secs = 15
# fallback_to_heuristic = true
"#;

const EXAMPLE_HISTORY: &str = r#"[
  {
    "score": 50,
    "max_score": 100,
    "level": 1,
    "category": "memory",
    "game_type": "digit-recall",
    "created_at": "2024-01-02T09:15:00Z"
  },
  {
    "score": 1,
    "max_score": 1,
    "level": 2,
    "category": "problem-solving",
    "game_type": "sudoku",
    "created_at": "2024-01-04T18:40:00Z"
  },
  {
    "score": 3,
    "max_score": 5,
    "level": 2,
    "category": "memory",
    "game_type": "name-recall",
    "created_at": "2024-01-10T10:05:00Z"
  },
  {
    "score": 83,
    "max_score": 100,
    "level": 2,
    "category": "memory",
    "game_type": "digit-recall",
    "created_at": "2024-01-24T08:30:00Z"
  },
  {
    "score": 21,
    "max_score": 30,
    "level": 3,
    "category": "attention",
    "game_type": "reaction",
    "created_at": "2024-01-25T17:20:00Z"
  }
]
"#;
