pub mod config;
pub mod error;
pub mod installments;
pub mod orchestrator;
pub mod transactions;

pub use config::{Config, InputFormat};
pub use error::{BatchError, Result};
pub use installments::{InstallmentDescriptor, Normalizer, ValidationPolicy, format, normalize};
pub use orchestrator::run;
pub use transactions::TransactionRecord;
