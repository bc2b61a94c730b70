//! Data module - CSV loading, cleaning and export

mod exporter;
mod loader;
mod processor;
pub mod schema;

pub use exporter::DataExporter;
pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError};
