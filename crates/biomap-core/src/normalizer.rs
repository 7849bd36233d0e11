//! Normalizer: turns heterogeneous numeric text into `Option<f64>`.
//!
//! Source spreadsheets mix locales and annotations freely: `"1 234,5"`,
//! `"370-450"`, `"370 à 450"`, `">450"`, `"n/a"`. [`parse_numeric`] accepts all
//! of them and never fails; anything without a usable number becomes `None`.
//!
//! Parsing is attempted in order: sentinel tokens → locale cleanup → dash
//! folding → numeric token extraction → range / single-value resolution.

use phf::phf_set;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Lower-cased cell contents that mean "no value".
static NAN_TOKENS: phf::Set<&'static str> = phf_set! {
    "nan", "n/a", "na", "none", "null", "-", "--",
};

/// Normalized techno keys of the gas family (biomethane, biogaz, bioCO₂).
static GAS_FAMILY_KEYS: phf::Set<&'static str> = phf_set! {
    "biomethane", "biogaz", "bioco2",
};

fn numeric_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("numeric token regex is valid"))
}

// ---------------------------------------------------------------------------
// Input boundary
// ---------------------------------------------------------------------------

/// A single raw cell on its way into the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericInput<'a> {
    Text(Cow<'a, str>),
    Missing,
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(s: &'a str) -> Self {
        NumericInput::Text(Cow::Borrowed(s))
    }
}

impl From<String> for NumericInput<'static> {
    fn from(s: String) -> Self {
        NumericInput::Text(Cow::Owned(s))
    }
}

impl<'a> From<Option<&'a str>> for NumericInput<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(NumericInput::Missing, NumericInput::from)
    }
}

impl<'a> From<&'a serde_json::Value> for NumericInput<'a> {
    fn from(v: &'a serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => NumericInput::Text(Cow::Borrowed(s)),
            serde_json::Value::Number(n) => NumericInput::Text(Cow::Owned(n.to_string())),
            serde_json::Value::Bool(b) => NumericInput::Text(Cow::Owned(b.to_string())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => NumericInput::Missing,
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric parsing
// ---------------------------------------------------------------------------

/// Coerce one cell to a float, or `None` if no number can be extracted.
pub fn normalize(input: &NumericInput<'_>) -> Option<f64> {
    match input {
        NumericInput::Missing => None,
        NumericInput::Text(text) => parse_numeric(text),
    }
}

/// Parse a raw numeric string.
///
/// - spaces, NBSP and narrow NBSP are dropped, `,` is read as the decimal point
/// - en dash, em dash, minus sign and the French `à` all become `-`
/// - with two or more numbers and a `-` present, the result is the mean of the
///   first two (`"370-450"` → 410)
/// - otherwise the first number wins (`">450"`, `"450+"`, `"~450 GWh"` → 450)
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NAN_TOKENS.contains(trimmed.to_lowercase().as_str()) {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| match c {
            ',' => '.',
            '\u{2013}' | '\u{2014}' | '\u{2212}' | 'à' => '-',
            other => other,
        })
        .collect();

    let values = numeric_tokens(&cleaned);
    match values.as_slice() {
        [] => None,
        [first, second, ..] if cleaned.contains('-') => Some((first + second) / 2.0),
        [first, ..] => Some(*first),
    }
}

/// Extract numbers left to right. A sign glued to a preceding digit is the
/// range separator, not part of the next number: `"370-450"` is 370 and 450.
fn numeric_tokens(s: &str) -> Vec<f64> {
    numeric_token_re()
        .find_iter(s)
        .filter_map(|m| {
            let token = m.as_str();
            let follows_digit = s[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit());
            let token = if follows_digit {
                token.trim_start_matches(['-', '+'])
            } else {
                token
            };
            token.parse::<f64>().ok()
        })
        .collect()
}

/// Normalize every cell of a column independently.
pub fn normalize_column<'a, I>(cells: I) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = NumericInput<'a>>,
{
    cells.into_iter().map(|cell| normalize(&cell)).collect()
}

/// Parse a latitude or longitude written with a decimal comma or stray spaces
/// (`"48,123"` → 48.123). Non-finite values count as missing.
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .trim()
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Label keys
// ---------------------------------------------------------------------------

/// Comparison key for techno labels: lower-case ASCII letters and digits only,
/// so `"Bio-CO2"` and `"bioCO2"` both become `"bioco2"`.
pub fn norm_key(label: &str) -> String {
    label
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Whether a techno label belongs to the gas family.
pub fn is_gas_family(techno: &str) -> bool {
    GAS_FAMILY_KEYS.contains(norm_key(techno).as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
