//! Transform metrics.
//!
//! Names follow Prometheus conventions. Nothing is exported unless the
//! embedding process installs a `metrics` recorder; without one every call
//! here is a no-op.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsParsed,
    RowsFailed,
    GroupsTransformed,
    GroupsFailed,
    EvaluationsDropped,
    GroupDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsParsed => "energuide_rows_parsed_total",
            MetricName::RowsFailed => "energuide_rows_failed_total",
            MetricName::GroupsTransformed => "energuide_groups_transformed_total",
            MetricName::GroupsFailed => "energuide_groups_failed_total",
            MetricName::EvaluationsDropped => "energuide_evaluations_dropped_total",
            MetricName::GroupDuration => "energuide_group_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        [
            MetricName::RowsParsed,
            MetricName::RowsFailed,
            MetricName::GroupsTransformed,
            MetricName::GroupsFailed,
            MetricName::EvaluationsDropped,
            MetricName::GroupDuration,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub mod transform {
    use super::MetricName;

    pub fn rows_parsed(count: usize) {
        ::metrics::counter!(MetricName::RowsParsed.as_str()).increment(count as u64);
    }

    pub fn row_failed(error_kind: &'static str) {
        ::metrics::counter!(MetricName::RowsFailed.as_str(), "kind" => error_kind).increment(1);
    }

    pub fn group_transformed() {
        ::metrics::counter!(MetricName::GroupsTransformed.as_str()).increment(1);
    }

    pub fn group_failed() {
        ::metrics::counter!(MetricName::GroupsFailed.as_str()).increment(1);
    }

    pub fn evaluations_dropped(count: usize) {
        ::metrics::counter!(MetricName::EvaluationsDropped.as_str()).increment(count as u64);
    }

    pub fn group_duration(secs: f64) {
        ::metrics::histogram!(MetricName::GroupDuration.as_str()).record(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed_and_unique() {
        let names: Vec<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert!(names.iter().all(|name| name.starts_with("energuide_")));

        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        transform::rows_parsed(3);
        transform::row_failed("invalid_input_data");
        transform::group_duration(0.25);
    }
}
