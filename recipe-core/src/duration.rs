use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::trace;

static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*hours?").expect("hours pattern"));

static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:minutes?|mins?|m)").expect("minutes pattern")
});

static BARE_INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("bare integer pattern"));

/// Total minutes described by a free-text duration such as `"1 hour 30 minutes"`,
/// `"45 min"` or `"90"`.
///
/// The hour and minute components are searched independently, so their order
/// in the text does not matter. Without either component the first integer in
/// the text is taken as minutes. Returns `None` for empty or number-free text,
/// and when the total does not fit in a `u32`.
pub fn parse_minutes(text: &str) -> Option<u32> {
    if text.trim().is_empty() {
        return None;
    }

    let hours = HOURS_RE.captures(text);
    let minutes = MINUTES_RE.captures(text);

    if hours.is_none() && minutes.is_none() {
        let bare = BARE_INT_RE.find(text)?;
        trace!(text, bare = bare.as_str(), "no unit found, reading bare minutes");
        return bare.as_str().parse().ok();
    }

    let mut total: u32 = 0;
    if let Some(caps) = hours {
        let h: u32 = caps[1].parse().ok()?;
        total = h.checked_mul(60)?;
    }
    if let Some(caps) = minutes {
        let m: u32 = caps[1].parse().ok()?;
        total = total.checked_add(m)?;
    }
    Some(total)
}

/// [`parse_minutes`] over a JSON field; anything but a string is unknown.
pub fn parse_minutes_value(value: &Value) -> Option<u32> {
    value.as_str().and_then(parse_minutes)
}

/// Sum of every phrase that parses, `None` if none of them do.
pub fn total_minutes<'a, I>(phrases: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    sum_minutes(phrases.into_iter().filter_map(parse_minutes))
}

/// Sum of already parsed durations; `None` when empty or on overflow.
pub fn sum_minutes<I>(minutes: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    minutes
        .into_iter()
        .try_fold(None, |acc: Option<u32>, m| {
            Some(Some(acc.unwrap_or(0).checked_add(m)?))
        })
        .flatten()
}

/// Render minutes as `"45m"`, `"2h"` or `"1h 30m"`; unknown durations render empty.
pub fn format_minutes(minutes: Option<u32>) -> String {
    let Some(minutes) = minutes else {
        return String::new();
    };
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {rest}m")
    }
}

/* ===========================
Unit tests
=========================== */
