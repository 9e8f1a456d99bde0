use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};

use csv::{ReaderBuilder, Writer};
use log::{debug, info, warn};

use crate::config::{Config, InputFormat};
use crate::error::Result;
use crate::installments::Normalizer;
use crate::transactions::{CsvTransactionRow, NormalizedTransaction, TransactionRecord};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub with_installments: usize,
    pub skipped: usize,
}

pub fn run(config: &Config) -> Result<BatchSummary> {
    let format = config.input_format()?;
    let file = File::open(&config.input)?;
    let normalizer = Normalizer::new(config.policy());

    info!(
        "normalizing {} as {:?} with {:?} validation",
        config.input.display(),
        format,
        normalizer.policy
    );

    let summary = process(file, std::io::stdout(), format, &normalizer)?;

    info!(
        "processed {} transactions, {} with installments, {} skipped",
        summary.processed, summary.with_installments, summary.skipped
    );
    Ok(summary)
}

/// Read every transaction from `reader`, normalize its installment field and
/// write one CSV row per transaction to `writer`.
pub fn process<R: Read, W: Write>(
    reader: R,
    writer: W,
    format: InputFormat,
    normalizer: &Normalizer,
) -> Result<BatchSummary> {
    let mut wtr = Writer::from_writer(writer);
    let mut summary = BatchSummary::default();

    match format {
        InputFormat::Csv => {
            let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
            for result in rdr.deserialize() {
                let row: CsvTransactionRow = result?;
                write_row(&mut wtr, TransactionRecord::from(row), normalizer, &mut summary)?;
            }
        }
        InputFormat::Jsonl => {
            for (index, line) in BufReader::new(reader).lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<TransactionRecord>(&line) {
                    Ok(record) => write_row(&mut wtr, record, normalizer, &mut summary)?,
                    Err(e) => {
                        warn!("skipping line {}: {}", index + 1, e);
                        summary.skipped += 1;
                    }
                }
            }
        }
    }

    wtr.flush()?;
    Ok(summary)
}

fn write_row<W: Write>(
    wtr: &mut Writer<W>,
    record: TransactionRecord,
    normalizer: &Normalizer,
    summary: &mut BatchSummary,
) -> Result<()> {
    let installment = normalizer.normalize(record.parcela_info.as_ref());
    match installment {
        Some(_) => summary.with_installments += 1,
        None => debug!("no usable installment info for transaction {}", record.id),
    }
    summary.processed += 1;

    wtr.serialize(NormalizedTransaction::new(record, installment))?;
    Ok(())
}
