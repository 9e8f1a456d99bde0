pub mod transaction;

pub use transaction::{CsvTransactionRow, NormalizedTransaction, TransactionRecord};
