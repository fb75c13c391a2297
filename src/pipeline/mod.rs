// Data processing pipeline: ingestion, processing, and extraction

pub mod extract;
pub mod ingestion;
pub mod output_schema;
pub mod processing;

// Re-export key types and functions from each stage
pub use ingestion::reader;
pub use processing::dwelling;
