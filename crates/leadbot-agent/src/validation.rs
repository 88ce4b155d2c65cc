// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Business rules for the capture flow.
//!
//! Pure checks return [`ValidationError`]; store-backed checks return
//! [`CheckError`], which separates a rule conflict from a storage failure.

use chrono::{Datelike, NaiveDate};
use leadbot_core::{LeadStore, LeadbotError, Service};
use thiserror::Error;

/// Input that fails a business rule on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name shorter than {MIN_NAME_CHARS} characters")]
    NameTooShort,
    #[error("phone is not 7-15 digits with optional leading +")]
    PhoneBadFormat,
    #[error("no catalog service with that exact name")]
    ServiceNotFound,
    #[error("appointment date is in the past")]
    DateInPast,
    #[error("appointment date is beyond next year")]
    DateTooFarAhead,
}

/// Input that is well-formed but clashes with stored leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PersistenceConflict {
    #[error("phone already registered under a different name")]
    PhoneOwnership,
    #[error("identical booking already exists")]
    DuplicateBooking,
}

/// Outcome of a store-backed check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Conflict(#[from] PersistenceConflict),
    #[error(transparent)]
    Store(#[from] LeadbotError),
}

pub const MIN_NAME_CHARS: usize = 3;
const MIN_PHONE_CHARS: usize = 7;
const MAX_PHONE_CHARS: usize = 15;

/// Accepts a name of at least three characters after trimming.
pub fn validate_name(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }
    Ok(trimmed.to_string())
}

/// Accepts an optional `+` followed by 7-15 digits, spaces or hyphens, and
/// returns the canonical form with spaces and hyphens removed.
pub fn validate_phone(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    let (plus, body) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    let len = body.chars().count();
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    let has_digit = body.chars().any(|c| c.is_ascii_digit());
    if !(MIN_PHONE_CHARS..=MAX_PHONE_CHARS).contains(&len) || !allowed || !has_digit {
        return Err(ValidationError::PhoneBadFormat);
    }

    let digits: String = body.chars().filter(char::is_ascii_digit).collect();
    Ok(format!("{plus}{digits}"))
}

/// Exact match of the trimmed text against catalog names.
pub fn validate_service_selection(
    text: &str,
    catalog: &[Service],
) -> Result<Service, ValidationError> {
    let wanted = text.trim();
    catalog
        .iter()
        .find(|s| s.name == wanted)
        .cloned()
        .ok_or(ValidationError::ServiceNotFound)
}

/// Rejects dates before `today` and dates after the end of next year.
pub fn validate_date_range(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::DateInPast);
    }
    if date.year() > today.year() + 1 {
        return Err(ValidationError::DateTooFarAhead);
    }
    Ok(())
}

fn same_person(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// A phone already on a lead must belong to the same (case-insensitive) name.
pub async fn check_phone_ownership(
    store: &dyn LeadStore,
    phone: &str,
    candidate_name: &str,
) -> Result<(), CheckError> {
    match store.find_lead_by_phone(phone).await? {
        Some(lead) if !same_person(&lead.name, candidate_name) => {
            Err(PersistenceConflict::PhoneOwnership.into())
        }
        _ => Ok(()),
    }
}

/// The (name, phone, service, date) tuple must not already be booked.
pub async fn check_duplicate_booking(
    store: &dyn LeadStore,
    name: &str,
    phone: &str,
    service_id: i64,
    date: NaiveDate,
) -> Result<(), CheckError> {
    if store.booking_exists(name, phone, service_id, date).await? {
        return Err(PersistenceConflict::DuplicateBooking.into());
    }
    Ok(())
}
