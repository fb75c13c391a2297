//! Validation of dwelling documents against `schemas/dwelling.v1.json`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::Result;

pub const DWELLING_SCHEMA_V1: &str = include_str!("../../schemas/dwelling.v1.json");

static SCHEMA_JSON: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(DWELLING_SCHEMA_V1).expect("embedded dwelling schema must be valid JSON")
});

static COMPILED: Lazy<JSONSchema> = Lazy::new(|| {
    JSONSchema::options()
        .compile(&SCHEMA_JSON)
        .expect("embedded dwelling schema must compile")
});

/// Every schema violation in `document`, as readable messages.
pub fn validate_document(document: &Value) -> std::result::Result<(), Vec<String>> {
    COMPILED.validate(document).map_err(|errors| {
        errors
            .map(|error| format!("{}: {}", error.instance_path, error))
            .collect()
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputCheck {
    pub valid: usize,
    /// `(line number, messages)` for each failing line, 1-based.
    pub invalid: Vec<(usize, Vec<String>)>,
}

impl OutputCheck {
    pub fn is_ok(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Check every line of a JSON-lines dwelling file. Lines that are not JSON
/// count as invalid rather than aborting the check.
pub fn validate_jsonl<P: AsRef<Path>>(path: P) -> Result<OutputCheck> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut check = OutputCheck::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = serde_json::from_str::<Value>(&line)
            .map_err(|e| vec![format!("not JSON: {}", e)])
            .and_then(|document| validate_document(&document));
        match outcome {
            Ok(()) => check.valid += 1,
            Err(messages) => check.invalid.push((index + 1, messages)),
        }
    }
    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn dwelling() -> Value {
        json!({
            "houseId": 456,
            "yearBuilt": 2000,
            "city": "Ottawa",
            "region": "ON",
            "forwardSortationArea": "K1P",
            "evaluations": [],
        })
    }

    #[test]
    fn test_minimal_dwelling_is_valid() {
        assert_eq!(validate_document(&dwelling()), Ok(()));
    }

    #[test]
    fn test_bad_region_is_rejected() {
        let mut document = dwelling();
        document["region"] = json!("Ontario");
        let errors = validate_document(&document).unwrap_err();
        assert!(errors.iter().any(|message| message.starts_with("/region")));
    }

    #[test]
    fn test_validate_jsonl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        std::fs::write(&path, format!("{}\nnot json\n", dwelling())).unwrap();

        let check = validate_jsonl(&path).unwrap();
        assert_eq!(check.valid, 1);
        assert_eq!(check.invalid.len(), 1);
        assert_eq!(check.invalid[0].0, 2);
        assert!(!check.is_ok());
    }
}
