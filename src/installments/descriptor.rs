use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Value};

/// One part of a multi-part purchase: installment `number` of `total`.
///
/// Descriptors parsed from text always satisfy `1 <= number <= total`.
/// Descriptors read from a record carry whatever the record held after
/// numeric coercion, so the counts are kept as `f64` and may be out of range
/// or NaN; use [`InstallmentDescriptor::is_valid`] to check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstallmentDescriptor {
    pub number: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<Decimal>,
}

impl InstallmentDescriptor {
    pub fn new(number: f64, total: f64, original_amount: Option<Decimal>) -> Self {
        Self {
            number,
            total,
            original_amount,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.number >= 1.0 && self.total >= 1.0 && self.number <= self.total
    }

    /// Part of a purchase split over more than one installment.
    pub fn is_split(&self) -> bool {
        self.total > 1.0
    }

    pub fn is_final(&self) -> bool {
        self.number == self.total
    }

    /// Installments still due after this one. Only defined for valid,
    /// integral descriptors.
    pub fn remaining(&self) -> Option<u32> {
        if !self.is_valid() || self.number.fract() != 0.0 || self.total.fract() != 0.0 {
            return None;
        }
        let left = self.total - self.number;
        if left > u32::MAX as f64 {
            return None;
        }
        Some(left as u32)
    }

    /// Value of a single installment, rounded to cents.
    pub fn installment_amount(&self) -> Option<Decimal> {
        let original = self.original_amount?;
        if !(self.total >= 1.0) {
            return None;
        }
        let total = Decimal::try_from(self.total).ok()?;
        original.checked_div(total).map(|amount| amount.round_dp(2))
    }

    /// Canonical record form, suitable for writing back into the field the
    /// descriptor was read from.
    pub fn to_record(&self) -> Value {
        let mut map = Map::new();
        map.insert("numero".to_string(), count_value(self.number));
        map.insert("total".to_string(), count_value(self.total));
        if let Some(amount) = self.original_amount {
            map.insert("valor_original".to_string(), amount_value(amount));
        }
        Value::Object(map)
    }
}

// Integral counts are written as JSON integers, anything else as a float
// (NaN and infinities become null).
fn count_value(count: f64) -> Value {
    if count.fract() == 0.0 && count.abs() < i64::MAX as f64 {
        Value::from(count as i64)
    } else {
        serde_json::Number::from_f64(count).map_or(Value::Null, Value::Number)
    }
}

fn amount_value(amount: Decimal) -> Value {
    let amount = amount.normalize();
    if amount.scale() == 0 {
        if let Some(n) = amount.to_i64() {
            return Value::from(n);
        }
    }
    amount
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// Render a count the way the dashboard shows numbers: `Infinity` rather than
/// `inf`, and no sign on zero.
pub fn format_count(count: f64) -> String {
    if count == 0.0 {
        "0".to_string()
    } else if count == f64::INFINITY {
        "Infinity".to_string()
    } else if count == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        count.to_string()
    }
}

impl fmt::Display for InstallmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format_count(self.number), format_count(self.total))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(number: f64, total: f64) -> InstallmentDescriptor {
        InstallmentDescriptor::new(number, total, None)
    }

    #[test]
    fn test_display_has_no_padding_or_decimals() {
        assert_eq!(descriptor(1.0, 3.0).to_string(), "1/3");
        assert_eq!(descriptor(12.0, 12.0).to_string(), "12/12");
    }

    #[test]
    fn test_display_of_unusual_counts() {
        assert_eq!(descriptor(5.0, f64::INFINITY).to_string(), "5/Infinity");
        assert_eq!(descriptor(f64::NEG_INFINITY, 1.0).to_string(), "-Infinity/1");
        assert_eq!(descriptor(-0.0, 1.0).to_string(), "0/1");
        assert_eq!(descriptor(f64::NAN, 2.0).to_string(), "NaN/2");
        assert_eq!(descriptor(2.5, 3.0).to_string(), "2.5/3");
    }

    #[test]
    fn test_validity() {
        assert!(descriptor(1.0, 1.0).is_valid());
        assert!(descriptor(2.0, 5.0).is_valid());
        assert!(!descriptor(0.0, 3.0).is_valid());
        assert!(!descriptor(4.0, 3.0).is_valid());
        assert!(!descriptor(f64::NAN, 3.0).is_valid());
    }

    #[test]
    fn test_split_and_final() {
        assert!(!descriptor(1.0, 1.0).is_split());
        assert!(descriptor(1.0, 1.0).is_final());
        assert!(descriptor(1.0, 2.0).is_split());
        assert!(!descriptor(1.0, 2.0).is_final());
    }

    #[test]
    fn test_remaining() {
        assert_eq!(descriptor(2.0, 10.0).remaining(), Some(8));
        assert_eq!(descriptor(3.0, 3.0).remaining(), Some(0));
        assert_eq!(descriptor(3.0, 2.0).remaining(), None);
        assert_eq!(descriptor(1.5, 3.0).remaining(), None);
    }

    #[test]
    fn test_installment_amount() {
        let d = InstallmentDescriptor::new(1.0, 3.0, Some(Decimal::new(100, 0)));
        assert_eq!(d.installment_amount(), Some(Decimal::new(3333, 2)));
        assert_eq!(descriptor(1.0, 3.0).installment_amount(), None);

        let zero_total = InstallmentDescriptor::new(1.0, 0.0, Some(Decimal::new(100, 0)));
        assert_eq!(zero_total.installment_amount(), None);
    }

    #[test]
    fn test_to_record() {
        let d = InstallmentDescriptor::new(1.0, 2.0, Some(Decimal::new(100, 0)));
        assert_eq!(d.to_record(), json!({"numero": 1, "total": 2, "valor_original": 100}));

        let cents = InstallmentDescriptor::new(2.0, 4.0, Some(Decimal::new(5990, 2)));
        assert_eq!(cents.to_record(), json!({"numero": 2, "total": 4, "valor_original": 59.9}));

        assert_eq!(descriptor(1.0, 1.0).to_record(), json!({"numero": 1, "total": 1}));
    }

    #[test]
    fn test_to_record_keeps_huge_counts_as_floats() {
        let edge = 9_223_372_036_854_775_808.0_f64;
        let record = descriptor(1.0, edge).to_record();
        assert!(record["total"].is_f64());
        assert_eq!(record["total"].as_f64(), Some(edge));

        let below = 4_611_686_018_427_387_904.0_f64;
        assert_eq!(descriptor(1.0, below).to_record()["total"], json!(4_611_686_018_427_387_904_i64));
    }
}
