pub mod orchestrator;

pub use orchestrator::{BatchSummary, process, run};
