//! Summaries over a feedback collection.
//!
//! Everything here is a pure function of the items and a reference instant, so
//! callers decide which snapshot to summarize and what "now" means.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

use crate::feedback::types::{FeedbackItem, FeedbackStatus, FeedbackType, Priority};

pub const TREND_WINDOW_DAYS: i64 = 7;

/// Share of ratings per mood, as whole percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Sentiment {
    /// Rating 4 or 5.
    pub positive: u32,
    /// Rating 3.
    pub neutral: u32,
    /// Rating 1 or 2.
    pub negative: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
    /// Nothing arrived in the previous window.
    New,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
            TrendDirection::New => "new",
        };
        f.write_str(s)
    }
}

/// Week-over-week submission volume. `change_percent` is an absolute value;
/// the direction carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub change_percent: u32,
}

impl Trend {
    const STABLE: Trend = Trend {
        direction: TrendDirection::Stable,
        change_percent: 0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackStats {
    pub total: usize,
    /// Mean rating rounded to one decimal, 0 for an empty collection.
    pub average_rating: f64,
    pub by_type: BTreeMap<FeedbackType, usize>,
    pub by_status: BTreeMap<FeedbackStatus, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    /// Index 0 counts rating 1, index 4 counts rating 5.
    pub rating_distribution: [usize; 5],
    pub sentiment: Sentiment,
    /// Submissions per month (January first) of the year of `now`.
    pub timeline: [usize; 12],
    pub trend: Trend,
}

/// Rounds halves towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    round_half_up(part as f64 * 100.0 / total as f64) as u32
}

pub fn average_rating(items: &[FeedbackItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let sum: u64 = items.iter().map(|i| u64::from(i.rating)).sum();
    round_half_up(sum as f64 / items.len() as f64 * 10.0) / 10.0
}

pub fn sentiment(items: &[FeedbackItem]) -> Sentiment {
    let total = items.len();
    let count = |pred: fn(u8) -> bool| items.iter().filter(|i| pred(i.rating)).count();
    Sentiment {
        positive: percent(count(|r| r >= 4), total),
        neutral: percent(count(|r| r == 3), total),
        negative: percent(count(|r| r <= 2), total),
    }
}

pub fn timeline(items: &[FeedbackItem], now: DateTime<Utc>) -> [usize; 12] {
    let mut months = [0; 12];
    for item in items.iter().filter(|i| i.created_at.year() == now.year()) {
        months[item.created_at.month0() as usize] += 1;
    }
    months
}

/// Compares the last seven days (up to and past `now`) with the seven before.
pub fn trend(items: &[FeedbackItem], now: DateTime<Utc>) -> Trend {
    if items.len() < 2 {
        return Trend::STABLE;
    }
    let last_week = now - Duration::days(TREND_WINDOW_DAYS);
    let two_weeks_ago = now - Duration::days(2 * TREND_WINDOW_DAYS);

    let this_week = items.iter().filter(|i| i.created_at >= last_week).count();
    let previous_week = items
        .iter()
        .filter(|i| i.created_at >= two_weeks_ago && i.created_at < last_week)
        .count();

    if previous_week == 0 {
        return Trend {
            direction: TrendDirection::New,
            change_percent: 100,
        };
    }

    let change = round_half_up(
        (this_week as f64 - previous_week as f64) / previous_week as f64 * 100.0,
    ) as i64;
    let direction = match change {
        c if c > 0 => TrendDirection::Up,
        c if c < 0 => TrendDirection::Down,
        _ => TrendDirection::Stable,
    };
    Trend {
        direction,
        change_percent: change.unsigned_abs() as u32,
    }
}

pub fn summarize(items: &[FeedbackItem], now: DateTime<Utc>) -> FeedbackStats {
    let mut by_type = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    let mut rating_distribution = [0; 5];

    for item in items {
        *by_type.entry(item.kind).or_insert(0) += 1;
        *by_status.entry(item.status).or_insert(0) += 1;
        *by_priority.entry(item.priority).or_insert(0) += 1;
        if (1..=5).contains(&item.rating) {
            rating_distribution[usize::from(item.rating) - 1] += 1;
        }
    }

    FeedbackStats {
        total: items.len(),
        average_rating: average_rating(items),
        by_type,
        by_status,
        by_priority,
        rating_distribution,
        sentiment: sentiment(items),
        timeline: timeline(items, now),
        trend: trend(items, now),
    }
}
