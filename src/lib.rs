pub mod assembler;
pub mod batch;
pub mod converter;
pub mod error;
pub mod parser;
pub mod translator;
pub mod utils;

// Re-export common items
pub use batch::{BatchConverter, BatchReport};
pub use converter::Converter;
pub use error::{ConvertError, ResolutionError};
pub use translator::Variant;
pub use utils::config::{BatchConfig, ConverterConfig};
