// src/utils/validation.rs
use chrono::{Datelike, Utc};
use regex::Regex;

use crate::models::DateParts;

// Field limits
pub const KANA_MAX_LEN: usize = 20;
pub const BIRTH_YEAR_MIN: i32 = 1900;
pub const BIRTH_MONTH_MIN: i32 = 1;
pub const BIRTH_MONTH_MAX: i32 = 12;
pub const BIRTH_DAY_MIN: i32 = 1;
pub const BIRTH_DAY_MAX: i32 = 31;

lazy_static::lazy_static! {
    // Katakana block plus the long-vowel mark, as rendered into the
    // form's pattern attribute.
    pub static ref KATAKANA_REGEX: Regex = Regex::new(r"^[ァ-ヶー]*$").unwrap();
}

/// The first year a birth-date entry will accept ranges up to the
/// current calendar year.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Whether a single character may be inserted into a kana field.
pub fn is_kana_char(c: char) -> bool {
    ('ァ'..='ヶ').contains(&c) || c == 'ー'
}

/// Edit-boundary guard for kana fields: the insertion is accepted only
/// if the character is katakana and the field is not full. Rejection
/// is silent; the caller simply drops the keystroke.
pub fn accept_kana_insertion(current: &str, c: char) -> bool {
    is_kana_char(c) && current.chars().count() < KANA_MAX_LEN
}

/// Whole-value kana check applied at the submission boundary.
pub fn validate_kana(value: &str) -> Result<(), &'static str> {
    if value.chars().count() > KANA_MAX_LEN {
        return Err("Kana name too long (maximum 20 characters)");
    }
    if !KATAKANA_REGEX.is_match(value) {
        return Err("Kana name must be katakana only");
    }
    Ok(())
}

fn accept_bounded_numeral(value: &str, max_len: usize, min: i32, max: i32) -> bool {
    // Clearing the sub-field is always an accepted edit; emptiness only
    // matters at submission time.
    if value.is_empty() {
        return true;
    }
    if value.len() > max_len || !value.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match value.parse::<i32>() {
        Ok(n) => n >= min && n <= max,
        Err(_) => false,
    }
}

/// Year sub-field guard against an explicit upper bound. The value is
/// accepted only while already parseable into [1900, max_year].
pub fn accept_year_edit_until(value: &str, max_year: i32) -> bool {
    accept_bounded_numeral(value, 4, BIRTH_YEAR_MIN, max_year)
}

pub fn accept_year_edit(value: &str) -> bool {
    accept_year_edit_until(value, current_year())
}

pub fn accept_month_edit(value: &str) -> bool {
    accept_bounded_numeral(value, 2, BIRTH_MONTH_MIN, BIRTH_MONTH_MAX)
}

/// Day guard is a plain [1, 31] range; there is no calendar
/// cross-check against month/year, so 02/31 passes here.
pub fn accept_day_edit(value: &str) -> bool {
    accept_bounded_numeral(value, 2, BIRTH_DAY_MIN, BIRTH_DAY_MAX)
}

/// Submission-boundary check over the composite date: every sub-field
/// present and within its own bounds.
pub fn validate_birth_date(parts: &DateParts) -> Result<(), &'static str> {
    if !parts.is_complete() {
        return Err("Birth date is incomplete");
    }
    if !accept_year_edit(&parts.year) {
        return Err("Birth year out of range");
    }
    if !accept_month_edit(&parts.month) {
        return Err("Birth month out of range");
    }
    if !accept_day_edit(&parts.day) {
        return Err("Birth day out of range");
    }
    Ok(())
}
