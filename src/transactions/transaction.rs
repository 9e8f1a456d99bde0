use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::installments::{InstallmentDescriptor, format_count};

/// A transaction as exported by the dashboard backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "installment", alias = "parcela")]
    pub parcela_info: Option<Value>,
}

/// A row of a CSV export. The csv reader guesses a type for every cell it
/// hands to `deserialize_any`, which would turn an id like `0042` into `42`,
/// so ids and amounts are read as text here.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvTransactionRow {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "decimal_text")]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "installment", alias = "parcela")]
    pub parcela_info: Option<String>,
}

impl From<CsvTransactionRow> for TransactionRecord {
    fn from(row: CsvTransactionRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            parcela_info: row.parcela_info.map(embedded_record),
        }
    }
}

// CSV cells can only hold text, so an installment record stored there arrives
// as a JSON string. Expand it back into the object it encodes.
fn embedded_record(text: String) -> Value {
    if text.trim_start().starts_with('{') {
        if let Some(object) = serde_json::from_str::<Value>(&text).ok().filter(Value::is_object) {
            return object;
        }
    }
    Value::String(text)
}

fn decimal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => Decimal::from_str(&text).map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// One output row: the transaction plus its normalized installment columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    pub id: String,
    pub description: String,
    pub amount: Option<Decimal>,
    pub installment: Option<String>,
    pub installment_number: Option<String>,
    pub installment_total: Option<String>,
    pub original_amount: Option<Decimal>,
    pub split: bool,
}

impl NormalizedTransaction {
    pub fn new(record: TransactionRecord, installment: Option<InstallmentDescriptor>) -> Self {
        Self {
            id: record.id,
            description: record.description,
            amount: record.amount,
            installment: installment.map(|d| d.to_string()),
            installment_number: installment.map(|d| format_count(d.number)),
            installment_total: installment.map(|d| format_count(d.total)),
            original_amount: installment.and_then(|d| d.original_amount),
            split: installment.is_some_and(|d| d.is_split()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(parcela_info: Option<Value>) -> TransactionRecord {
        TransactionRecord {
            id: "tx-1".to_string(),
            description: "Notebook".to_string(),
            amount: Some(Decimal::new(50, 0)),
            parcela_info,
        }
    }

    #[test]
    fn test_deserialize_from_json() {
        let line = r#"{"id": 42, "description": "TV", "amount": "199.90", "parcela_info": "1/3"}"#;
        let record: TransactionRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.amount, Some(Decimal::new(1999, 1)));
        assert_eq!(record.parcela_info, Some(json!("1/3")));
    }

    #[test]
    fn test_installment_alias_and_missing_fields() {
        let line = r#"{"id": "a", "installment": {"numero": 1, "total": 2}}"#;
        let record: TransactionRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.amount, None);
        assert_eq!(record.parcela_info, Some(json!({"numero": 1, "total": 2})));
    }

    fn csv_row(parcela_info: Option<&str>) -> CsvTransactionRow {
        CsvTransactionRow {
            id: "0042".to_string(),
            description: "Notebook".to_string(),
            amount: Some(Decimal::new(110, 2)),
            parcela_info: parcela_info.map(str::to_string),
        }
    }

    #[test]
    fn test_csv_row_expands_embedded_record() {
        let rec = TransactionRecord::from(csv_row(Some(r#" {"numero": 2, "total": 5}"#)));
        assert_eq!(rec.id, "0042");
        assert_eq!(rec.parcela_info, Some(json!({"numero": 2, "total": 5})));

        let plain = TransactionRecord::from(csv_row(Some("2/5")));
        assert_eq!(plain.parcela_info, Some(json!("2/5")));

        let broken = TransactionRecord::from(csv_row(Some("{numero")));
        assert_eq!(broken.parcela_info, Some(json!("{numero")));

        let missing = TransactionRecord::from(csv_row(None));
        assert_eq!(missing.parcela_info, None);
    }

    #[test]
    fn test_csv_row_keeps_id_and_amount_text() {
        let mut rdr = csv::Reader::from_reader("id,amount,parcela_info\n0042,1.10,1/2\n007,,\n".as_bytes());
        let rows: Vec<CsvTransactionRow> = rdr
            .deserialize::<CsvTransactionRow>()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows[0].id, "0042");
        assert_eq!(rows[0].amount.map(|a| a.to_string()).as_deref(), Some("1.10"));
        assert_eq!(rows[0].parcela_info.as_deref(), Some("1/2"));
        assert_eq!(rows[1].id, "007");
        assert_eq!(rows[1].amount, None);
        assert_eq!(rows[1].parcela_info, None);
    }

    #[test]
    fn test_normalized_row() {
        let descriptor = InstallmentDescriptor::new(1.0, 3.0, Some(Decimal::new(150, 0)));
        let row = NormalizedTransaction::new(record(None), Some(descriptor));
        assert_eq!(row.installment.as_deref(), Some("1/3"));
        assert_eq!(row.installment_number.as_deref(), Some("1"));
        assert_eq!(row.installment_total.as_deref(), Some("3"));
        assert_eq!(row.original_amount, Some(Decimal::new(150, 0)));
        assert!(row.split);

        let unbounded = InstallmentDescriptor::new(-0.0, f64::INFINITY, None);
        let row = NormalizedTransaction::new(record(None), Some(unbounded));
        assert_eq!(row.installment_number.as_deref(), Some("0"));
        assert_eq!(row.installment_total.as_deref(), Some("Infinity"));

        let single = NormalizedTransaction::new(record(None), None);
        assert_eq!(single.installment, None);
        assert!(!single.split);
    }
}
