//! Display formatting for table cells and summaries (en-US conventions).

use chrono::{DateTime, NaiveDate, Utc};

/// Groups the integer digits of `digits` with commas.
fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Renders `value` with exactly `decimals` fraction digits and grouped
/// thousands, without a sign.
fn fixed_grouped(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    match rendered.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(&rendered),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

fn currency_decimals(code: &str) -> usize {
    match code {
        "JPY" | "KRW" | "VND" => 0,
        _ => 2,
    }
}

/// Formats a monetary amount, e.g. `$1,234.50` or `IDR 1,250,000.00`.
///
/// Currencies without a well-known symbol are prefixed with their code.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    let body = fixed_grouped(amount, currency_decimals(&code));
    let sign = if amount < 0.0 && body.chars().any(|c| c != '0' && c.is_ascii_digit()) {
        "-"
    } else {
        ""
    };
    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, body),
        None => format!("{}{} {}", sign, code, body),
    }
}

/// Formats a plain number with grouped thousands and at most three
/// fraction digits, trailing zeros removed.
pub fn format_number(value: f64) -> String {
    let fixed = fixed_grouped(value, 3);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if value < 0.0 && trimmed != "0" {
        format!("-{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Short money figure for dense tables: `$15.0M`, `$50.0K`, `$500`.
pub fn format_compact(value: f64, symbol: &str) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000_000.0 {
        format!("{}{}{:.1}B", sign, symbol, abs / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{}{}{:.1}M", sign, symbol, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}{}{:.1}K", sign, symbol, abs / 1_000.0)
    } else {
        format!("{}{}{}", sign, symbol, abs.round())
    }
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `M/D/YYYY`, e.g. `3/7/2025`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Formats a date string, returning it unchanged when it cannot be parsed.
pub fn format_date_str(raw: &str) -> String {
    parse_date(raw)
        .map(|d| format_date(&d))
        .unwrap_or_else(|| raw.to_string())
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Human phrase for the distance between `date` and `now`: "now",
/// "5 minutes ago", "yesterday", "in 3 hours", ...
pub fn format_relative_time(date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*date).num_seconds();
    if diff == 0 {
        return "now".to_string();
    }
    let past = diff > 0;
    let secs = diff.abs();
    let amount = if secs < 60 {
        plural(secs, "second")
    } else if secs < 3_600 {
        plural(secs / 60, "minute")
    } else if secs < 86_400 {
        plural(secs / 3_600, "hour")
    } else {
        let days = secs / 86_400;
        if days == 1 {
            return if past { "yesterday" } else { "tomorrow" }.to_string();
        }
        plural(days, "day")
    };
    if past {
        format!("{} ago", amount)
    } else {
        format!("in {}", amount)
    }
}

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Cuts `text` to `max_chars` characters and appends `...` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}
