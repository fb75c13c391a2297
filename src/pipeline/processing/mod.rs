// Pipeline processing: row validation, dwelling assembly, deduplication and snippets

pub mod dedup;
pub mod dwelling;
pub mod snippets;
pub mod validator;

pub use dwelling::{Dwelling, Evaluation, ParsedDwellingDataRow};
pub use validator::RawRecord;
