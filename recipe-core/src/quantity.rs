use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Leading quantity found in a piece of ingredient text.
///
/// Both fields are `None` when the text does not start with a number.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    /// Parsed magnitude.
    pub value: Option<f64>,
    /// Exact leading substring of the trimmed input that produced `value`.
    pub matched: Option<String>,
}

impl ParsedQuantity {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.value.is_some()
    }
}

type Extractor = fn(&Captures<'_>) -> Option<f64>;

/// One grammar rule: an anchored pattern plus the function turning its captures into a value.
/// An extractor returning `None` rejects the match and the next rule is tried.
struct Rule {
    name: &'static str,
    pattern: Regex,
    extract: Extractor,
}

// ASCII digits only; `\d` in `regex` is Unicode-aware.
static RULES: LazyLock<[Rule; 3]> = LazyLock::new(|| {
    [
        Rule {
            name: "mixed",
            pattern: Regex::new(r"^([0-9]+)\s+([0-9]+)/([0-9]+)").expect("mixed number pattern"),
            extract: extract_mixed,
        },
        Rule {
            name: "fraction",
            pattern: Regex::new(r"^([0-9]+)/([0-9]+)").expect("fraction pattern"),
            extract: extract_fraction,
        },
        Rule {
            name: "decimal",
            pattern: Regex::new(r"^[0-9]*\.?[0-9]+").expect("decimal pattern"),
            extract: extract_decimal,
        },
    ]
});

fn group(caps: &Captures<'_>, i: usize) -> Option<f64> {
    caps.get(i)?.as_str().parse().ok()
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

fn extract_mixed(caps: &Captures<'_>) -> Option<f64> {
    let whole = group(caps, 1)?;
    Some(whole + ratio(group(caps, 2)?, group(caps, 3)?)?)
}

fn extract_fraction(caps: &Captures<'_>) -> Option<f64> {
    ratio(group(caps, 1)?, group(caps, 2)?)
}

fn extract_decimal(caps: &Captures<'_>) -> Option<f64> {
    group(caps, 0)
}

/// Parse the leading quantity of `text`.
///
/// Rules are tried in order against the trimmed input: mixed number (`1 1/2`),
/// simple fraction (`3/4`), then decimal or integer (`2`, `0.5`, `.25`).
/// A zero denominator rejects the fraction rules, so `"1/0"` falls through
/// to the decimal rule and yields `1` with `matched = "1"`.
pub fn parse_quantity_string(text: &str) -> ParsedQuantity {
    let trimmed = text.trim();

    for rule in RULES.iter() {
        let Some(caps) = rule.pattern.captures(trimmed) else {
            continue;
        };
        match (rule.extract)(&caps) {
            Some(value) => {
                let matched = caps[0].to_string();
                trace!(rule = rule.name, value, matched = %matched, "quantity matched");
                return ParsedQuantity {
                    value: Some(value),
                    matched: Some(matched),
                };
            }
            None => debug!(rule = rule.name, input = trimmed, "zero denominator, trying next rule"),
        }
    }

    ParsedQuantity::none()
}

/* ===========================
Unit tests
=========================== */
