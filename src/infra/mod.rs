pub mod jsonl_output_adapter;

pub use jsonl_output_adapter::JsonlDwellingOutputAdapter;
