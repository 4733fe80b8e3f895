//! Amount and date presentation helpers.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Compact display: amounts from 10000 up are shown in tenths of 万 with a
/// trailing `W`, everything below falls back to grouped formatting.
pub fn shorthand_amount(amount: f64) -> String {
    if amount >= 10_000.0 {
        let wan = format!("{:.1}", amount / 10_000.0);
        let wan = wan.strip_suffix(".0").unwrap_or(&wan);
        format!("{wan}W")
    } else {
        grouped_amount(amount)
    }
}

/// Full display with thousands separators, cents only when present.
pub fn grouped_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let mut out = group_digits(&whole.to_string());
    if frac != 0 {
        let frac = format!("{frac:02}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date.format("%B %Y").to_string(),
        None => format!("{year}-{month:02}"),
    }
}

pub fn day_label(year: i32, month: u32, day: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date.format("%b %d").to_string(),
        None => format!("{month:02}-{day:02}"),
    }
}

pub fn timestamp_label(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_uses_wan_above_ten_thousand() {
        insta::assert_snapshot!(shorthand_amount(25_000.0), @"2.5W");
        insta::assert_snapshot!(shorthand_amount(200_000.0), @"20W");
        insta::assert_snapshot!(shorthand_amount(10_000.0), @"1W");
    }

    #[test]
    fn shorthand_falls_back_below_ten_thousand() {
        insta::assert_snapshot!(shorthand_amount(9_500.0), @"9,500");
        insta::assert_snapshot!(shorthand_amount(42.0), @"42");
    }

    #[test]
    fn grouped_amount_keeps_cents_only_when_present() {
        insta::assert_snapshot!(grouped_amount(1_234_567.5), @"1,234,567.5");
        insta::assert_snapshot!(grouped_amount(1_000.0), @"1,000");
        insta::assert_snapshot!(grouped_amount(0.25), @"0.25");
    }

    #[test]
    fn month_and_day_labels() {
        insta::assert_snapshot!(month_label(2025, 7), @"July 2025");
        insta::assert_snapshot!(day_label(2025, 7, 9), @"Jul 09");
    }
}
