//! Field checks run before anything leaves the process.

use std::sync::OnceLock;

use regex::Regex;

use crate::error_handling::types::FieldIssue;
use crate::feedback::types::{FeedbackItem, NewFeedback};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

pub fn is_valid_rating(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

fn require(issues: &mut Vec<FieldIssue>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, "is required"));
    }
}

/// Checks an email field, reporting either absence or bad shape.
pub fn check_email(issues: &mut Vec<FieldIssue>, email: &str) {
    if email.trim().is_empty() {
        issues.push(FieldIssue::new("email", "is required"));
    } else if !is_valid_email(email) {
        issues.push(FieldIssue::new("email", "is not a valid address"));
    }
}

/// Returns every problem with the draft, or `Ok` when it can be submitted.
pub fn validate_draft(draft: &NewFeedback) -> Result<(), Vec<FieldIssue>> {
    let mut issues = Vec::new();
    require(&mut issues, "name", &draft.author_name);
    check_email(&mut issues, &draft.author_email);
    require(&mut issues, "title", &draft.title);
    require(&mut issues, "description", &draft.description);
    if !is_valid_rating(draft.rating) {
        issues.push(FieldIssue::new(
            "rating",
            format!("must be between {MIN_RATING} and {MAX_RATING}"),
        ));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Checks a record received from the remote before it may enter the snapshot.
///
/// Only the collection invariants are enforced here: a usable id and a rating
/// in range. The server has its own rules for the free-text fields.
pub fn validate_record(item: &FeedbackItem) -> Result<(), Vec<FieldIssue>> {
    let mut issues = Vec::new();
    require(&mut issues, "id", &item.id);
    if !is_valid_rating(item.rating) {
        issues.push(FieldIssue::new(
            "rating",
            format!("must be between {MIN_RATING} and {MAX_RATING}, got {}", item.rating),
        ));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), Vec<FieldIssue>> {
    let mut issues = Vec::new();
    check_email(&mut issues, email);
    if password.chars().count() < MIN_PASSWORD_LEN {
        issues.push(FieldIssue::new(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), Vec<FieldIssue>> {
    let mut issues = match validate_credentials(email, password) {
        Ok(()) => Vec::new(),
        Err(issues) => issues,
    };
    if name.trim().is_empty() {
        issues.insert(0, FieldIssue::new("name", "is required"));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
