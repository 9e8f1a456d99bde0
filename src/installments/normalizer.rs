use serde_json::Value;

use crate::installments::descriptor::InstallmentDescriptor;
use crate::installments::raw::{RawInstallment, coerce_amount, coerce_number, trim_blank};

/// Which inputs get the `1 <= number <= total` range check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Only `"N/M"` text is range checked; records pass through as coerced.
    #[default]
    TextOnly,
    /// Records are range checked as well.
    Uniform,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    pub policy: ValidationPolicy,
}

impl Normalizer {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Turn a raw installment field into a descriptor, or `None` when the field
    /// is missing or unusable.
    pub fn normalize(&self, raw: Option<&Value>) -> Option<InstallmentDescriptor> {
        match RawInstallment::classify(raw) {
            RawInstallment::Empty | RawInstallment::Unrecognized => None,
            RawInstallment::Record {
                number,
                total,
                original_amount,
            } => {
                let descriptor = InstallmentDescriptor::new(
                    coerce_number(number),
                    coerce_number(total),
                    original_amount.and_then(coerce_amount),
                );
                match self.policy {
                    ValidationPolicy::TextOnly => Some(descriptor),
                    ValidationPolicy::Uniform => Some(descriptor).filter(|d| d.is_valid()),
                }
            }
            RawInstallment::Text(text) => parse_text(text).filter(|d| d.is_valid()),
        }
    }

    /// Render the field as `"<number>/<total>"`.
    pub fn format(&self, raw: Option<&Value>) -> Option<String> {
        self.normalize(raw).map(|d| d.to_string())
    }
}

/// Accepts exactly `<digits>/<digits>` once quote characters are removed and
/// the rest is trimmed.
fn parse_text(text: &str) -> Option<InstallmentDescriptor> {
    let cleaned: String = text.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let (number, total) = trim_blank(&cleaned).split_once('/')?;
    Some(InstallmentDescriptor::new(
        parse_digits(number)?,
        parse_digits(total)?,
        None,
    ))
}

fn parse_digits(part: &str) -> Option<f64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

pub fn normalize(raw: &Value) -> Option<InstallmentDescriptor> {
    Normalizer::default().normalize(Some(raw))
}

pub fn format(raw: &Value) -> Option<String> {
    Normalizer::default().format(Some(raw))
}
