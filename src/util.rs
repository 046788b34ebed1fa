// Utility helpers for parsing and basic statistics.
//
// This module centralizes the "dirty" cell handling (unit suffixes, currency
// prefixes, several date layouts) so the rest of the code can assume clean,
// typed values.
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use num_format::{Locale, ToFormattedString};

/// Date layouts seen in spreadsheet exports, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a mileage cell like `"15000 km"`, `"15.000 km"` or `"15000"`.
///
/// - Strips a trailing `km` unit (any case, with or without a space).
/// - Accepts `.` or `,` as digit-group separators, but only between groups
///   of exactly three digits.
/// - Returns `None` for anything else, including negative values.
pub fn parse_mileage(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    let lower = s.to_ascii_lowercase();
    let digits = lower.strip_suffix("km").unwrap_or(&lower).trim_end();
    if digits.is_empty() {
        return None;
    }

    let is_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    let mut groups = digits.split(['.', ',']);
    let head = groups.next()?;
    if !is_digits(head) {
        return None;
    }
    let tail: Vec<&str> = groups.collect();
    if !tail.is_empty() && (head.len() > 3 || tail.iter().any(|g| g.len() != 3 || !is_digits(g))) {
        return None;
    }

    let mut joined = String::from(head);
    for g in tail {
        joined.push_str(g);
    }
    joined.parse::<u64>().ok()
}

/// Parse a cost cell, allowing a `R$`/`$` prefix and `,` thousands
/// separators. Rejects text and non-finite values.
pub fn parse_cost(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s
        .strip_prefix("R$")
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s)
        .trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an expiration cell. Any time-of-day component is dropped.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Whole days from `reference` until midnight of `expiration`, floored.
///
/// Flooring matters for the sign: any instant past midnight of the
/// expiration day, down to the nanosecond, is `-1`, not `0`.
pub fn days_until(expiration: NaiveDate, reference: NaiveDateTime) -> i64 {
    let delta = expiration.and_time(NaiveTime::default()) - reference;
    // num_days truncates toward zero; step down when a negative delta
    // leaves a remainder.
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// First whitespace-delimited token of a vehicle name.
pub fn extract_brand(name: &str) -> String {
    name.split_whitespace().next().unwrap_or("").to_string()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_thousands(int_part);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Insert the `en` locale separator between groups of three digits. Works on
/// the digit string so values beyond `i64` keep their digits.
fn group_thousands(digits: &str) -> String {
    let sep = Locale::en.separator();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
