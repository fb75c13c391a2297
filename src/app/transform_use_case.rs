use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::app::ports::DwellingOutputPort;
use crate::constants::GROUPING_FIELD;
use crate::domain::LabelPolicy;
use crate::error::EnerguideError;
use crate::observability::metrics::transform as metrics;
use crate::pipeline::ingestion::reader::grouper;
use crate::pipeline::processing::dwelling::Dwelling;
use crate::pipeline::processing::validator::RawRecord;

/// What to do with a house whose rows do not transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log the failure, count it and continue with the next house.
    #[default]
    Skip,
    /// Stop at the first failing house.
    Halt,
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(OnError::Skip),
            "halt" => Ok(OnError::Halt),
            other => Err(format!("unknown on-error policy '{}', expected skip or halt", other)),
        }
    }
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnError::Skip => write!(f, "skip"),
            OnError::Halt => write!(f, "halt"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub rows: usize,
    pub groups: usize,
    pub dwellings_written: usize,
    pub groups_failed: usize,
    pub evaluations_dropped: usize,
}

/// Use case for turning raw extract rows into dwelling documents
pub struct TransformUseCase {
    output: Box<dyn DwellingOutputPort>,
    on_error: OnError,
    label_policy: LabelPolicy,
    parallel: bool,
}

impl TransformUseCase {
    pub fn new(output: Box<dyn DwellingOutputPort>) -> Self {
        Self {
            output,
            on_error: OnError::default(),
            label_policy: LabelPolicy::default(),
            parallel: true,
        }
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_label_policy(mut self, label_policy: LabelPolicy) -> Self {
        self.label_policy = label_policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Group `records` by house, transform every group and write the
    /// resulting dwellings in input order.
    pub fn run<I>(&mut self, records: I) -> Result<TransformSummary>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let groups: Vec<Vec<RawRecord>> = grouper(records, GROUPING_FIELD).collect();
        let rows: usize = groups.iter().map(Vec::len).sum();
        info!(rows, groups = groups.len(), on_error = %self.on_error, "Transforming dwellings");

        let policy = self.label_policy;
        let results: Vec<std::result::Result<Dwelling, EnerguideError>> = if self.parallel {
            groups.par_iter().map(|group| transform_group(group, policy)).collect()
        } else {
            groups.iter().map(|group| transform_group(group, policy)).collect()
        };

        let mut summary = TransformSummary {
            rows,
            groups: groups.len(),
            ..TransformSummary::default()
        };

        for (group, result) in groups.iter().zip(results) {
            match result {
                Ok(dwelling) => {
                    let dropped = group.len().saturating_sub(dwelling.evaluations.len());
                    summary.evaluations_dropped += dropped;
                    metrics::evaluations_dropped(dropped);

                    self.output.write_dwelling(&dwelling)?;
                    summary.dwellings_written += 1;
                }
                Err(e) => {
                    summary.groups_failed += 1;
                    let house_id = group.first().and_then(|row| row.get(GROUPING_FIELD));
                    match self.on_error {
                        OnError::Skip => {
                            warn!(house_id = ?house_id, error = %e, "Skipping house");
                        }
                        OnError::Halt => {
                            self.output.flush()?;
                            return Err(anyhow::Error::new(e)
                                .context(format!("Failed to transform house {:?}", house_id)));
                        }
                    }
                }
            }
        }

        self.output.flush()?;
        info!(
            written = summary.dwellings_written,
            failed = summary.groups_failed,
            dropped = summary.evaluations_dropped,
            "Finished transforming dwellings"
        );
        Ok(summary)
    }
}

fn transform_group(group: &[RawRecord], policy: LabelPolicy) -> std::result::Result<Dwelling, EnerguideError> {
    let started = Instant::now();
    let result = Dwelling::from_group_with_policy(group, policy);
    metrics::group_duration(started.elapsed().as_secs_f64());

    match &result {
        Ok(dwelling) => {
            metrics::rows_parsed(group.len());
            metrics::group_transformed();
            debug!(
                house_id = dwelling.house_id,
                evaluations = dwelling.evaluations.len(),
                "Transformed house"
            );
        }
        Err(e) => {
            metrics::row_failed(error_kind(e));
            metrics::group_failed();
        }
    }
    result
}

fn error_kind(error: &EnerguideError) -> &'static str {
    match error {
        EnerguideError::InvalidInputData(_) => "invalid_input_data",
        EnerguideError::InvalidEmbeddedData { .. } => "invalid_embedded_data",
        EnerguideError::InvalidGroupSize(_) => "invalid_group_size",
        EnerguideError::MalformedFragment(_) => "malformed_fragment",
        EnerguideError::MissingValue(_) => "missing_value",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    struct MockDwellingOutput {
        pub dwellings: Arc<Mutex<Vec<Dwelling>>>,
    }

    impl DwellingOutputPort for MockDwellingOutput {
        fn write_dwelling(&mut self, dwelling: &Dwelling) -> Result<()> {
            self.dwellings.lock().unwrap().push(dwelling.clone());
            Ok(())
        }
    }

    fn row(house_id: &str, eval_id: &str, eval_type: &str, entry_date: &str) -> RawRecord {
        let value: Value = json!({
            "HOUSE_ID": house_id,
            "EVAL_ID": eval_id,
            "EVAL_TYPE": eval_type,
            "ENTRYDATE": entry_date,
            "CREATIONDATE": "2018-01-08 09:00:00",
            "MODIFICATIONDATE": null,
            "CLIENTCITY": "Ottawa",
            "forwardSortationArea": "K1P",
            "HOUSEREGION": "Ontario",
            "YEARBUILT": "2000",
            "BUILDER": "4K13D01404",
            "upgrades": [],
            "WALLDEF": null,
            "UGRWALLDEF": null,
            "EGHHLWALLS": null,
            "UGRHLWALLS": null,
        });
        value.as_object().cloned().unwrap()
    }

    fn use_case(parallel: bool) -> (TransformUseCase, Arc<Mutex<Vec<Dwelling>>>) {
        let dwellings = Arc::new(Mutex::new(Vec::new()));
        let output = Box::new(MockDwellingOutput {
            dwellings: dwellings.clone(),
        });
        (TransformUseCase::new(output).with_parallel(parallel), dwellings)
    }

    fn records() -> Vec<RawRecord> {
        let mut bad = row("2", "21", "D", "2018-01-01");
        bad.insert("forwardSortationArea".into(), json!("K16"));
        vec![
            row("1", "11", "D", "2018-01-01"),
            row("1", "12", "E", "2018-01-01"),
            bad,
            row("3", "31", "D", "2018-03-01"),
        ]
    }

    #[test]
    fn test_skip_policy_continues() {
        for parallel in [true, false] {
            let (mut use_case, dwellings) = use_case(parallel);
            let summary = use_case.run(records()).unwrap();

            assert_eq!(summary.rows, 4);
            assert_eq!(summary.groups, 3);
            assert_eq!(summary.dwellings_written, 2);
            assert_eq!(summary.groups_failed, 1);
            assert_eq!(summary.evaluations_dropped, 1);

            let ids: Vec<i64> = dwellings.lock().unwrap().iter().map(|d| d.house_id).collect();
            assert_eq!(ids, vec![1, 3]);
        }
    }

    #[test]
    fn test_halt_policy_stops() {
        let (use_case, dwellings) = use_case(false);
        let mut use_case = use_case.with_on_error(OnError::Halt);
        let err = use_case.run(records()).unwrap_err();

        assert!(err.to_string().contains("Failed to transform house"));
        assert_eq!(dwellings.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_on_error_from_str() {
        assert_eq!("skip".parse::<OnError>().unwrap(), OnError::Skip);
        assert_eq!(" HALT ".parse::<OnError>().unwrap(), OnError::Halt);
        assert!("retry".parse::<OnError>().is_err());
    }
}
