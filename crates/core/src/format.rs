//! Display formatting used by catalog and dashboard views.

use chrono::{DateTime, Utc};

/// Date rendering styles offered to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Jan 5, 2024`
    #[default]
    Short,
    /// `January 5, 2024`
    Long,
    /// `Friday, January 5, 2024`
    Full,
    /// `Jan 5, 2024, 03:07 PM`
    Time,
}

/// Format a course length given in minutes (`45 min`, `1h 30m`).
pub fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Format an elapsed time given in seconds (`1h 2m`, `3m 5s`, `9s`).
pub fn format_time(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hrs > 0 {
        format!("{hrs}h {mins}m")
    } else if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Format a price in the given ISO currency (`$1,234.50`).
///
/// Currencies without a known symbol are prefixed with their code.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let (symbol, decimals) = match currency {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "JPY" => ("¥", 0),
        _ => ("", 2),
    };

    let scale = 10u64.pow(decimals);
    let scaled = (amount.abs() * scale as f64).round() as u64;
    let whole = group_thousands(scaled / scale);
    let body = if decimals == 0 {
        whole
    } else {
        format!("{whole}.{:0width$}", scaled % scale, width = decimals as usize)
    };

    let sign = if amount < 0.0 && scaled > 0 { "-" } else { "" };
    if symbol.is_empty() {
        format!("{sign}{currency}\u{a0}{body}")
    } else {
        format!("{sign}{symbol}{body}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_date(date: DateTime<Utc>, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Short => "%b %-d, %Y",
        DateStyle::Long => "%B %-d, %Y",
        DateStyle::Full => "%A, %B %-d, %Y",
        DateStyle::Time => "%b %-d, %Y, %I:%M %p",
    };
    date.format(pattern).to_string()
}

/// Cut `s` to at most `length` characters, appending `...` when shortened.
pub fn truncate(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let mut out: String = s.chars().take(length).collect();
    out.push_str("...");
    out
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// URL slug: lower-case ASCII words joined by single dashes.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;

    for ch in s.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_dash = true;
        }
        // anything else is dropped without splitting words
    }
    out
}

/// Loose phone-number shape: at least ten of digits, spaces, `-`, `+`, `(`, `)`.
pub fn is_phone_number(s: &str) -> bool {
    s.chars().count() >= 10
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
}
