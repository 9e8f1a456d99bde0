pub mod descriptor;
pub mod normalizer;
pub mod raw;

pub use descriptor::{InstallmentDescriptor, format_count};
pub use normalizer::{Normalizer, ValidationPolicy, format, normalize};
pub use raw::RawInstallment;
