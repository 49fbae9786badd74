//! Deterministic display formatters for dates, strings and numbers.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    YmdDash,
    DmySlash,
    MdySlash,
    YmdHm,
    DmyHm,
    YmdHms,
}

pub fn format_date(date: DateTime<Utc>, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::YmdDash => "%Y-%m-%d",
        DateStyle::DmySlash => "%d/%m/%Y",
        DateStyle::MdySlash => "%m/%d/%Y",
        DateStyle::YmdHm => "%Y-%m-%d %H:%M",
        DateStyle::DmyHm => "%d/%m/%Y %H:%M",
        DateStyle::YmdHms => "%Y-%m-%d %H:%M:%S",
    };
    date.format(pattern).to_string()
}

pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(date);
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes();

    if days > 0 {
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    } else if hours > 0 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else if minutes > 0 {
        format!("{} minute{} ago", minutes, if minutes > 1 { "s" } else { "" })
    } else {
        "Just now".to_string()
    }
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub fn truncate(value: &str, max_length: usize) -> String {
    const SUFFIX: &str = "...";
    if value.chars().count() <= max_length {
        return value.to_string();
    }
    let keep = max_length.saturating_sub(SUFFIX.len());
    let truncated: String = value.chars().take(keep).collect();
    truncated + SUFFIX
}

pub fn slugify(value: &str) -> String {
    let cleaned: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    let mut slug = String::with_capacity(cleaned.len());
    let mut last_was_dash = true; // eats leading separators
    for c in cleaned.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !last_was_dash {
                slug.push('-');
                last_was_dash = true;
            }
        } else {
            slug.push(c);
            last_was_dash = false;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Marks every case-insensitive occurrence of `term` with brackets, the
/// text-mode stand-in for a highlight span.
/// Byte offsets rely on lowercasing not changing lengths, which holds for
/// the ASCII search terms this UI deals in.
pub fn highlight(text: &str, term: &str) -> String {
    if term.is_empty() || term.len() > text.len() {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_term = term.to_lowercase();
    if lower_text.len() != text.len() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut idx = 0;
    while let Some(pos) = lower_text[idx..].find(&lower_term) {
        let start = idx + pos;
        let end = start + lower_term.len();
        out.push_str(&text[idx..start]);
        out.push('[');
        out.push_str(&text[start..end]);
        out.push(']');
        idx = end;
    }
    out.push_str(&text[idx..]);
    out
}

pub fn add_commas(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as i64;
    let formatted = format!("${}.{:02}", add_commas(cents / 100), cents % 100);
    if negative {
        format!("-{formatted}")
    } else {
        formatted
    }
}

pub fn number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

pub fn percentage(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}
