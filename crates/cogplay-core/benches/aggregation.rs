use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cogplay_core::model::ScoreRecord;
use cogplay_core::statistics::{aggregate, rolling, summarize_by_game, trend, WindowUnit, SIX_MONTHS_OF_WEEKS};

const GAMES: [&str; 4] = ["digit-recall", "sudoku", "reaction", "then-what"];

fn make_history(n: usize) -> Vec<ScoreRecord> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    (0..n)
        .map(|i| ScoreRecord {
            score: (i % 11) as f64,
            max_score: 10.0,
            level: Some((i % 3) as u8 + 1),
            category: "memory".into(),
            game_type: GAMES[i % GAMES.len()].into(),
            created_at: start + Duration::hours(7 * i as i64),
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for n in [100, 1_000, 10_000] {
        let history = make_history(n);
        group.bench_function(format!("weekly/{n}"), |b| {
            b.iter(|| aggregate(black_box(&history), WindowUnit::Week))
        });
        group.bench_function(format!("monthly/{n}"), |b| {
            b.iter(|| aggregate(black_box(&history), WindowUnit::Month))
        });
    }

    group.finish();
}

fn bench_rolling_trend(c: &mut Criterion) {
    let history = make_history(1_000);
    let now = history.last().map(|r| r.created_at).unwrap_or_else(Utc::now);

    c.bench_function("rolling/26_weeks+trend", |b| {
        b.iter(|| {
            let windows = rolling(black_box(&history), WindowUnit::Week, now, SIX_MONTHS_OF_WEEKS);
            trend(&windows)
        })
    });

    c.bench_function("summarize_by_game/1000", |b| {
        b.iter(|| summarize_by_game(black_box(&history)))
    });
}

criterion_group!(benches, bench_aggregate, bench_rolling_trend);
criterion_main!(benches);
