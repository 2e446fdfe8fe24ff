//! Rolling-window progress statistics.
//!
//! Score history is bucketed into ISO weeks (starting Monday) or calendar
//! months. Windows with no usable scores carry `None` rather than zero so
//! that a chart can draw a gap instead of a dip.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ScoreRecord;

/// Six months of weekly windows.
pub const SIX_MONTHS_OF_WEEKS: usize = 26;

/// Upper bound on the windows [`rolling`] builds: twenty years of weeks.
pub const MAX_ROLLING_WINDOWS: usize = 1_040;

const WEEKS_PER_MONTH: f64 = 4.33;
const TREND_DEADBAND: f64 = 0.5;
const EASY_LEVEL_MAX: f64 = 1.3;
const HARD_LEVEL_MIN: f64 = 2.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    Week,
    Month,
}

impl WindowUnit {
    /// First day of the window containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            WindowUnit::Week => {
                let offset = date.weekday().num_days_from_monday();
                date - Days::new(u64::from(offset))
            }
            WindowUnit::Month => date.with_day(1).unwrap_or(date),
        }
    }

    fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            WindowUnit::Week => start.checked_add_days(Days::new(7)),
            WindowUnit::Month => start.checked_add_months(Months::new(1)),
        }
    }

    fn back(self, start: NaiveDate, windows: u32) -> Option<NaiveDate> {
        match self {
            WindowUnit::Week => start.checked_sub_days(Days::new(7 * u64::from(windows))),
            WindowUnit::Month => start.checked_sub_months(Months::new(windows)),
        }
    }
}

impl fmt::Display for WindowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowUnit::Week => write!(f, "week"),
            WindowUnit::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for WindowUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" => Ok(WindowUnit::Week),
            "month" | "monthly" => Ok(WindowUnit::Month),
            other => Err(format!("unknown window unit: {other}")),
        }
    }
}

pub fn window_start(timestamp: DateTime<Utc>, unit: WindowUnit) -> NaiveDate {
    unit.start_of(timestamp.date_naive())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLabel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLabel {
    pub fn from_mean_level(mean: f64) -> Self {
        if mean <= EASY_LEVEL_MAX {
            DifficultyLabel::Easy
        } else if mean >= HARD_LEVEL_MIN {
            DifficultyLabel::Hard
        } else {
            DifficultyLabel::Medium
        }
    }
}

impl fmt::Display for DifficultyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyLabel::Easy => write!(f, "easy"),
            DifficultyLabel::Medium => write!(f, "medium"),
            DifficultyLabel::Hard => write!(f, "hard"),
        }
    }
}

/// Statistics for one week or month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub window_start: NaiveDate,
    /// Mean percentage over records with a positive max score; `None` if there were none.
    pub average_percentage: Option<u32>,
    /// Label for the mean difficulty level; `None` if no record carried a level.
    pub average_difficulty: Option<DifficultyLabel>,
    /// Records that fell in the window.
    pub sample_count: usize,
}

impl WindowStats {
    fn from_records(window_start: NaiveDate, records: &[&ScoreRecord]) -> Self {
        let percentages: Vec<f64> = records.iter().filter_map(|r| r.percentage()).collect();
        let average_percentage = mean(&percentages).map(|m| m.round().max(0.0) as u32);

        let levels: Vec<f64> = records
            .iter()
            .filter_map(|r| r.level.map(f64::from))
            .collect();
        let average_difficulty = mean(&levels).map(DifficultyLabel::from_mean_level);

        Self {
            window_start,
            average_percentage,
            average_difficulty,
            sample_count: records.len(),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Bucket every record, from the earliest window to the latest, filling gaps with empty windows.
pub fn aggregate(points: &[ScoreRecord], unit: WindowUnit) -> Vec<WindowStats> {
    let starts = points.iter().map(|p| window_start(p.created_at, unit));
    let (Some(from), Some(to)) = (starts.clone().min(), starts.max()) else {
        return Vec::new();
    };
    aggregate_between(points, unit, from, to)
}

/// Bucket the records falling between the windows containing `from` and `to`, inclusive.
pub fn aggregate_between(
    points: &[ScoreRecord],
    unit: WindowUnit,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<WindowStats> {
    let from = unit.start_of(from);
    let to = unit.start_of(to);

    let mut grouped: BTreeMap<NaiveDate, Vec<&ScoreRecord>> = BTreeMap::new();
    for p in points {
        let start = window_start(p.created_at, unit);
        if start >= from && start <= to {
            grouped.entry(start).or_default().push(p);
        }
    }

    let mut windows = Vec::new();
    let mut cursor = Some(from);
    while let Some(start) = cursor.filter(|s| *s <= to) {
        let records = grouped.get(&start).map(Vec::as_slice).unwrap_or_default();
        windows.push(WindowStats::from_records(start, records));
        cursor = unit.next(start);
    }
    windows
}

/// The last `count` windows up to and including the one containing `now`.
///
/// `count` is capped at [`MAX_ROLLING_WINDOWS`]; near the start of the
/// calendar the range stops at the earliest representable window.
pub fn rolling(points: &[ScoreRecord], unit: WindowUnit, now: DateTime<Utc>, count: usize) -> Vec<WindowStats> {
    let count = count.min(MAX_ROLLING_WINDOWS);
    if count == 0 {
        return Vec::new();
    }
    let to = window_start(now, unit);
    let mut from = to;
    for _ in 1..count {
        match unit.back(from, 1) {
            Some(previous) => from = previous,
            None => break,
        }
    }
    aggregate_between(points, unit, from, to)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Percentage points gained per month between the first and last populated windows.
    pub rate_per_month: Option<f64>,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.direction {
            TrendDirection::Improving => "Improving",
            TrendDirection::Declining => "Declining",
            TrendDirection::Stable => "Stable",
            TrendDirection::InsufficientData => return write!(f, "Not enough data"),
        };
        match self.rate_per_month {
            Some(rate) => write!(f, "{label} ({rate:+.1} points/month)"),
            None => write!(f, "{label}"),
        }
    }
}

/// Compare the first and last populated windows.
pub fn trend(windows: &[WindowStats]) -> Trend {
    let mut populated = windows
        .iter()
        .filter_map(|w| w.average_percentage.map(|p| (w.window_start, f64::from(p))));
    let first = populated.next();
    let last = populated.last();

    let insufficient = Trend {
        direction: TrendDirection::InsufficientData,
        rate_per_month: None,
    };
    let (Some((first_start, first_value)), Some((last_start, last_value))) = (first, last) else {
        return insufficient;
    };

    let weeks = (last_start - first_start).num_days() as f64 / 7.0;
    if weeks <= 0.0 {
        return insufficient;
    }
    let rate = (last_value - first_value) / (weeks / WEEKS_PER_MONTH);

    let direction = if rate > TREND_DEADBAND {
        TrendDirection::Improving
    } else if rate < -TREND_DEADBAND {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    Trend {
        direction,
        rate_per_month: Some(rate),
    }
}

/// Lifetime totals for one game type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_type: String,
    pub attempts: usize,
    pub average_percentage: Option<u32>,
    pub best_percentage: Option<u32>,
    pub last_played: DateTime<Utc>,
}

/// Per-game totals, ordered by game type.
pub fn summarize_by_game(points: &[ScoreRecord]) -> Vec<GameSummary> {
    let mut grouped: BTreeMap<&str, Vec<&ScoreRecord>> = BTreeMap::new();
    for p in points {
        grouped.entry(p.game_type.as_str()).or_default().push(p);
    }

    grouped
        .into_iter()
        .filter_map(|(game_type, records)| {
            let last_played = records.iter().map(|r| r.created_at).max()?;
            let percentages: Vec<f64> = records.iter().filter_map(|r| r.percentage()).collect();
            let best = percentages.iter().copied().fold(None, |best: Option<f64>, p| {
                Some(best.map_or(p, |b| b.max(p)))
            });
            Some(GameSummary {
                game_type: game_type.to_string(),
                attempts: records.len(),
                average_percentage: mean(&percentages).map(|m| m.round().max(0.0) as u32),
                best_percentage: best.map(|b| b.round().max(0.0) as u32),
                last_played,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(score: f64, max_score: f64, level: Option<u8>, y: i32, m: u32, d: u32) -> ScoreRecord {
        ScoreRecord {
            score,
            max_score,
            level,
            category: "memory".into(),
            game_type: "digit-recall".into(),
            created_at: Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2024-01-01 is a Monday
        assert_eq!(WindowUnit::Week.start_of(date(2024, 1, 3)), date(2024, 1, 1));
        assert_eq!(WindowUnit::Week.start_of(date(2024, 1, 7)), date(2024, 1, 1));
        assert_eq!(WindowUnit::Week.start_of(date(2024, 1, 8)), date(2024, 1, 8));
        assert_eq!(WindowUnit::Month.start_of(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn single_record_window() {
        let windows = aggregate(&[record(50.0, 100.0, Some(2), 2024, 1, 3)], WindowUnit::Week);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].average_percentage, Some(50));
        assert_eq!(windows[0].average_difficulty, Some(DifficultyLabel::Medium));
        assert_eq!(windows[0].sample_count, 1);
    }

    #[test]
    fn empty_windows_are_null_not_zero() {
        let points = [
            record(50.0, 100.0, None, 2024, 1, 2),
            record(0.0, 10.0, None, 2024, 1, 16),
        ];
        let windows = aggregate(&points, WindowUnit::Week);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[1].window_start, date(2024, 1, 8));
        assert_eq!(windows[1].average_percentage, None);
        assert_eq!(windows[1].sample_count, 0);
        assert_eq!(windows[2].average_percentage, Some(0));
    }

    #[test]
    fn zero_max_score_does_not_count_towards_percentage() {
        let points = [
            record(5.0, 0.0, Some(1), 2024, 3, 4),
            record(8.0, 10.0, Some(1), 2024, 3, 5),
        ];
        let windows = aggregate(&points, WindowUnit::Week);
        assert_eq!(windows[0].average_percentage, Some(80));
        assert_eq!(windows[0].sample_count, 2);

        let only_zero = aggregate(&points[..1], WindowUnit::Week);
        assert_eq!(only_zero[0].average_percentage, None);
    }

    #[test]
    fn difficulty_label_boundaries() {
        assert_eq!(DifficultyLabel::from_mean_level(1.0), DifficultyLabel::Easy);
        assert_eq!(DifficultyLabel::from_mean_level(1.3), DifficultyLabel::Easy);
        assert_eq!(DifficultyLabel::from_mean_level(2.0), DifficultyLabel::Medium);
        assert_eq!(DifficultyLabel::from_mean_level(2.7), DifficultyLabel::Hard);
    }

    #[test]
    fn monthly_buckets() {
        let points = [
            record(6.0, 10.0, Some(3), 2024, 1, 31),
            record(8.0, 10.0, Some(3), 2024, 3, 1),
        ];
        let windows = aggregate(&points, WindowUnit::Month);
        let starts: Vec<NaiveDate> = windows.iter().map(|w| w.window_start).collect();
        assert_eq!(starts, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
        assert_eq!(windows[0].average_difficulty, Some(DifficultyLabel::Hard));
        assert_eq!(windows[1].average_difficulty, None);
    }

    #[test]
    fn rolling_six_months_of_weeks() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let points = [
            record(70.0, 100.0, None, 2024, 6, 28),
            record(10.0, 100.0, None, 2023, 1, 1),
        ];
        let windows = rolling(&points, WindowUnit::Week, now, SIX_MONTHS_OF_WEEKS);
        assert_eq!(windows.len(), SIX_MONTHS_OF_WEEKS);
        assert_eq!(windows.last().unwrap().window_start, date(2024, 6, 24));
        assert_eq!(windows.last().unwrap().average_percentage, Some(70));
        assert_eq!(windows.iter().map(|w| w.sample_count).sum::<usize>(), 1);
    }

    #[test]
    fn rolling_caps_huge_window_counts() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let points = [record(70.0, 100.0, None, 2024, 6, 28)];
        for unit in [WindowUnit::Week, WindowUnit::Month] {
            let windows = rolling(&points, unit, now, 100_000_000);
            assert_eq!(windows.len(), MAX_ROLLING_WINDOWS);
            assert_eq!(windows.last().unwrap().average_percentage, Some(70));
        }

        let near_start = Utc.from_utc_datetime(&NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap());
        let windows = rolling(&[], WindowUnit::Month, near_start, 12);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn trend_improving() {
        let points = [
            record(50.0, 100.0, None, 2024, 1, 1),
            record(60.0, 100.0, None, 2024, 1, 29),
        ];
        let t = trend(&aggregate(&points, WindowUnit::Week));
        assert_eq!(t.direction, TrendDirection::Improving);
        // 10 points over 4 weeks
        let rate = t.rate_per_month.unwrap();
        assert!((rate - 10.825).abs() < 0.01, "{rate}");
        assert!(t.to_string().starts_with("Improving (+10.8"));
    }

    #[test]
    fn trend_declining_and_stable() {
        let declining = [
            record(80.0, 100.0, None, 2024, 1, 1),
            record(60.0, 100.0, None, 2024, 3, 4),
        ];
        assert_eq!(
            trend(&aggregate(&declining, WindowUnit::Week)).direction,
            TrendDirection::Declining
        );

        let stable = [
            record(60.0, 100.0, None, 2024, 1, 1),
            record(61.0, 100.0, None, 2024, 6, 3),
        ];
        assert_eq!(
            trend(&aggregate(&stable, WindowUnit::Week)).direction,
            TrendDirection::Stable
        );
    }

    #[test]
    fn trend_needs_two_populated_windows() {
        let t = trend(&aggregate(&[record(50.0, 100.0, None, 2024, 1, 1)], WindowUnit::Week));
        assert_eq!(t.direction, TrendDirection::InsufficientData);
        assert_eq!(t.to_string(), "Not enough data");
        assert_eq!(trend(&[]).direction, TrendDirection::InsufficientData);
    }

    #[test]
    fn per_game_summary() {
        let mut sudoku = record(9.0, 10.0, Some(2), 2024, 2, 1);
        sudoku.game_type = "sudoku".into();
        let points = [
            record(4.0, 10.0, Some(1), 2024, 1, 1),
            record(6.0, 10.0, Some(1), 2024, 1, 2),
            sudoku,
        ];
        let summary = summarize_by_game(&points);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].game_type, "digit-recall");
        assert_eq!(summary[0].attempts, 2);
        assert_eq!(summary[0].average_percentage, Some(50));
        assert_eq!(summary[0].best_percentage, Some(60));
        assert_eq!(summary[1].best_percentage, Some(90));
    }
}
