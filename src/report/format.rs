use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write;

/// Default display format for calendar dates, e.g. "March 05, 2026".
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

pub fn format_grouped_int(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Insert thousands separators into a string of ASCII digits.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a money amount as `$1,234.56`, sign before the currency label.
pub fn format_money(value: f64, currency_symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{currency_symbol}{value}");
    }
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let grouped = group_digits(whole);

    // -0.001 rounds to 0.00 and must not print as negative
    if value < 0.0 && cents.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        format!("-{currency_symbol}{grouped}.{frac}")
    } else {
        format!("{currency_symbol}{grouped}.{frac}")
    }
}

/// One decimal place and a trailing `%`.
pub fn format_percent(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.1}%")
}

/// Whether `date_format` is a strftime pattern chrono can render.
pub fn is_valid_date_format(date_format: &str) -> bool {
    !StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error))
}

/// Falls back to ISO dates when the pattern cannot be rendered.
pub fn format_date(date: NaiveDate, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}
