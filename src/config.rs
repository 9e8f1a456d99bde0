use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::error::{BatchError, Result};
use crate::installments::ValidationPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "installment_normalizer")]
#[command(about = "Normalize installment info in exported transactions", long_about = None)]
#[command(version)]
pub struct Config {
    /// Transactions export (CSV with a header row, or JSON lines)
    pub input: PathBuf,

    /// Input format; guessed from the file extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Range check structured records too, not only "N/M" text
    #[arg(long)]
    pub strict: bool,
}

impl Config {
    pub fn input_format(&self) -> Result<InputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => format_from_extension(&self.input),
        }
    }

    pub fn policy(&self) -> ValidationPolicy {
        if self.strict {
            ValidationPolicy::Uniform
        } else {
            ValidationPolicy::TextOnly
        }
    }
}

fn format_from_extension(path: &Path) -> Result<InputFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => Ok(InputFormat::Csv),
        Some("jsonl") | Some("ndjson") => Ok(InputFormat::Jsonl),
        _ => Err(BatchError::UnknownFormat(path.display().to_string())),
    }
}
