use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

const NUMBER_KEYS: [&str; 2] = ["numero", "number"];
const TOTAL_KEYS: [&str; 1] = ["total"];
const ORIGINAL_AMOUNT_KEYS: [&str; 3] = ["valor_original", "originalAmount", "original_amount"];

/// Shape of a raw installment field, decided before anything is extracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInstallment<'a> {
    Empty,
    Record {
        number: &'a Value,
        total: &'a Value,
        original_amount: Option<&'a Value>,
    },
    Text(&'a str),
    Unrecognized,
}

impl<'a> RawInstallment<'a> {
    /// Classify a field that may be missing from the record altogether.
    pub fn classify(raw: Option<&'a Value>) -> Self {
        let Some(value) = raw else {
            return RawInstallment::Empty;
        };

        if is_falsy(value) {
            return RawInstallment::Empty;
        }

        match value {
            Value::Object(map) => match (lookup(map, &NUMBER_KEYS), lookup(map, &TOTAL_KEYS)) {
                (Some(number), Some(total)) => RawInstallment::Record {
                    number,
                    total,
                    original_amount: lookup(map, &ORIGINAL_AMOUNT_KEYS).filter(|v| !v.is_null()),
                },
                _ => RawInstallment::Unrecognized,
            },
            Value::String(text) => RawInstallment::Text(text.as_str()),
            _ => RawInstallment::Unrecognized,
        }
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Numeric coercion with the loose rules the dashboard's records were written
/// under: null and blank text are zero, booleans are 0/1, everything that is
/// not a number is NaN.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => coerce_text(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Trim whitespace the way the dashboard's text fields are trimmed, which
/// includes a leading byte order mark.
pub fn trim_blank(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn coerce_text(text: &str) -> f64 {
    let text = trim_blank(text);
    if let Some(value) = coerce_radix(text) {
        return value;
    }
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that should stay NaN here
        _ if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => text.parse::<f64>().unwrap_or(f64::NAN),
    }
}

// Unsigned 0x/0o/0b literals. A prefix with no valid digits is NaN.
fn coerce_radix(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Original amounts are money, so they go through `Decimal` instead of `f64`.
/// Values that cannot be represented are dropped.
pub fn coerce_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let s = trim_blank(s);
            if s.is_empty() {
                Some(Decimal::ZERO)
            } else {
                parse_decimal(s)
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
