use std::fmt::Write;

use crate::analytics::FeedbackStats;
use crate::feedback::types::{FeedbackItem, FeedbackStatus, FeedbackType, Priority};
use crate::query::types::Page;
use crate::repository::types::{DataSource, SaveOutcome, SyncState};
use crate::session_management::session::UserProfile;

const OFFLINE_NOTICE: &str = "(remote unavailable, showing the local copy)";

pub fn item_line(item: &FeedbackItem) -> String {
    format!(
        "{}  [{}] {}/{}  {}/5  {}  ({} <{}>, {})",
        item.id,
        item.status,
        item.kind,
        item.priority,
        item.rating,
        item.title,
        item.author_name,
        item.author_email,
        item.created_at.format("%Y-%m-%d"),
    )
}

fn source_notice(out: &mut String, source: DataSource) {
    if source.is_degraded() {
        out.push_str(OFFLINE_NOTICE);
        out.push('\n');
    }
}

pub fn listing(items: &[FeedbackItem], source: DataSource) -> String {
    let mut out = String::new();
    source_notice(&mut out, source);
    if items.is_empty() {
        out.push_str("No feedback yet");
        return out;
    }
    for item in items {
        out.push_str(&item_line(item));
        out.push('\n');
    }
    let _ = write!(out, "{} item(s)", items.len());
    out
}

pub fn page(page: &Page<FeedbackItem>, source: DataSource) -> String {
    let mut out = String::new();
    source_notice(&mut out, source);
    for item in &page.content {
        out.push_str(&item_line(item));
        out.push('\n');
    }
    let _ = write!(
        out,
        "Page {} of {} ({} matching)",
        page.page,
        page.total_pages.max(1),
        page.total_elements
    );
    if page.has_next() {
        let _ = write!(out, ", next: --page {}", page.page + 1);
    }
    out
}

pub fn saved(outcome: &SaveOutcome) -> String {
    match outcome {
        SaveOutcome::SavedRemote(item) => format!("Submitted feedback {}", item.id),
        SaveOutcome::SavedOffline(item) => format!(
            "Saved feedback {} locally; the remote service could not be reached",
            item.id
        ),
    }
}

pub fn sync_suffix(sync: SyncState) -> &'static str {
    match sync {
        SyncState::Synced => "",
        SyncState::LocalOnly => " (local only, not confirmed by the remote service)",
    }
}

pub fn user(profile: &UserProfile) -> String {
    format!("{} <{}>", profile.name, profile.email)
}

pub fn stats(stats: &FeedbackStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total: {}", stats.total);
    let _ = writeln!(out, "Average rating: {:.1}", stats.average_rating);

    let counts = |out: &mut String, label: &str, pairs: Vec<(String, usize)>| {
        let joined = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{label}: {joined}");
    };
    // Every variant is listed, including the ones nobody filed yet.
    counts(
        &mut out,
        "By type",
        FeedbackType::ALL
            .iter()
            .map(|k| (k.to_string(), stats.by_type.get(k).copied().unwrap_or(0)))
            .collect(),
    );
    counts(
        &mut out,
        "By status",
        FeedbackStatus::ALL
            .iter()
            .map(|k| (k.to_string(), stats.by_status.get(k).copied().unwrap_or(0)))
            .collect(),
    );
    counts(
        &mut out,
        "By priority",
        Priority::ALL
            .iter()
            .map(|k| (k.to_string(), stats.by_priority.get(k).copied().unwrap_or(0)))
            .collect(),
    );
    counts(
        &mut out,
        "Ratings",
        stats
            .rating_distribution
            .iter()
            .enumerate()
            .map(|(i, n)| (format!("{}*", i + 1), *n))
            .collect(),
    );
    let _ = writeln!(
        out,
        "Sentiment: {}% positive, {}% neutral, {}% negative",
        stats.sentiment.positive, stats.sentiment.neutral, stats.sentiment.negative
    );
    let months = stats
        .timeline
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "This year by month: {months}");
    let _ = write!(
        out,
        "This week: {} ({}%)",
        stats.trend.direction, stats.trend.change_percent
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics;
    use chrono::{TimeZone, Utc};

    fn sample() -> FeedbackItem {
        FeedbackItem {
            id: "42".into(),
            author_name: "Ann".into(),
            author_email: "ann@example.com".into(),
            kind: FeedbackType::Bug,
            priority: Priority::High,
            title: "Login broken".into(),
            description: "500 on submit".into(),
            rating: 2,
            status: FeedbackStatus::InProgress,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn item_line_shows_key_fields() {
        assert_eq!(
            item_line(&sample()),
            "42  [in-progress] bug/high  2/5  Login broken  (Ann <ann@example.com>, 2024-05-01)"
        );
    }

    #[test]
    fn degraded_listing_carries_notice() {
        let out = listing(&[sample()], DataSource::Fallback);
        assert!(out.starts_with(OFFLINE_NOTICE));
        assert!(out.ends_with("1 item(s)"));
        assert!(!listing(&[], DataSource::Remote).contains(OFFLINE_NOTICE));
    }

    #[test]
    fn empty_page_reports_one_page() {
        let empty: Page<FeedbackItem> = Page::empty(1, 5);
        assert_eq!(page(&empty, DataSource::Remote), "Page 1 of 1 (0 matching)");
    }

    #[test]
    fn page_with_more_results_names_the_next_one() {
        let first = Page {
            content: vec![sample()],
            page: 1,
            page_size: 1,
            total_pages: 3,
            total_elements: 3,
        };
        let out = page(&first, DataSource::Remote);
        assert!(out.ends_with("Page 1 of 3 (3 matching), next: --page 2"));

        let last = Page { page: 3, ..first };
        assert!(page(&last, DataSource::Remote).ends_with("Page 3 of 3 (3 matching)"));
    }

    #[test]
    fn stats_list_categories_without_entries() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let out = stats(&analytics::summarize(&[sample()], now));
        assert!(out.contains("By type: bug=1, feature=0, "));
        assert!(out.contains("By status: pending=0, in-progress=1, "));
        assert!(out.contains("By priority: low=0, medium=0, high=1, "));
    }
}
