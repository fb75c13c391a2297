// Pipeline ingestion: raw record readers and grouping

pub mod reader;

pub use reader::{grouper, read_jsonl, read_zip, Grouper};
