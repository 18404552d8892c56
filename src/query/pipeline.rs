//! Filter, sort and paginate a feedback collection.
//!
//! Everything here is a pure function of its inputs, so the same code serves
//! the offline search path and tests alike.

use std::cmp::Ordering;

use log::debug;

use crate::error_handling::types::QueryError;
use crate::feedback::types::FeedbackItem;
use crate::query::types::{FeedbackQuery, Page, SortKey};

/// Case-insensitive match of `needle` (already lowercased) against the
/// searchable text fields.
fn matches_text(item: &FeedbackItem, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&item.title, &item.description, &item.author_name]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

pub fn matches(item: &FeedbackItem, query: &FeedbackQuery, needle: &str) -> bool {
    matches_text(item, needle) && query.status.matches(item.status) && query.kind.matches(item.kind)
}

/// Items passing every filter of `query`, in input order.
pub fn filter<'a>(items: &'a [FeedbackItem], query: &FeedbackQuery) -> Vec<&'a FeedbackItem> {
    let needle = query.trimmed_text().to_lowercase();
    items
        .iter()
        .filter(|item| matches(item, query, &needle))
        .collect()
}

fn compare(a: &FeedbackItem, b: &FeedbackItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => b.created_at.cmp(&a.created_at),
        SortKey::Rating => b.rating.cmp(&a.rating),
        SortKey::Title => a.title.cmp(&b.title),
    }
}

/// Stable sort: equal keys keep their relative input order.
pub fn sort(items: &mut [&FeedbackItem], key: SortKey) {
    items.sort_by(|a, b| compare(a, b, key));
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

/// Runs the whole pipeline and returns the requested page.
///
/// A page past the end is empty rather than an error; `page == 0` or
/// `page_size == 0` are rejected.
pub fn run(items: &[FeedbackItem], query: &FeedbackQuery) -> Result<Page<FeedbackItem>, QueryError> {
    query.validate()?;

    let mut selected = filter(items, query);
    sort(&mut selected, query.sort);

    let total_elements = selected.len();
    let start = (query.page - 1).saturating_mul(query.page_size);
    let content: Vec<FeedbackItem> = selected
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    debug!(
        "query `{}` matched {} of {} item(s), page {} holds {}",
        query.trimmed_text(),
        total_elements,
        items.len(),
        query.page,
        content.len()
    );

    Ok(Page {
        content,
        page: query.page,
        page_size: query.page_size,
        total_pages: total_pages(total_elements, query.page_size),
        total_elements,
    })
}
