//! Metrics for the import pipeline.
//!
//! Recording goes through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use std::fmt;

/// All metric names used by the importer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsSeen,
    RowsImported,
    RowsSkipped,
    RowsFailed,
    FieldNotices,
    MalformedRecords,
    WriteDuration,
    RunDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsSeen => "pantry_rows_seen_total",
            MetricName::RowsImported => "pantry_rows_imported_total",
            MetricName::RowsSkipped => "pantry_rows_skipped_total",
            MetricName::RowsFailed => "pantry_rows_failed_total",
            MetricName::FieldNotices => "pantry_field_notices_total",
            MetricName::MalformedRecords => "pantry_malformed_records_total",
            MetricName::WriteDuration => "pantry_write_duration_seconds",
            MetricName::RunDuration => "pantry_run_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RowsSeen,
            RowsImported,
            RowsSkipped,
            RowsFailed,
            FieldNotices,
            MalformedRecords,
            WriteDuration,
            RunDuration,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod rows {
    use super::MetricName;

    pub fn seen() {
        ::metrics::counter!(MetricName::RowsSeen.as_str()).increment(1);
    }

    pub fn imported() {
        ::metrics::counter!(MetricName::RowsImported.as_str()).increment(1);
    }

    pub fn skipped() {
        ::metrics::counter!(MetricName::RowsSkipped.as_str()).increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::RowsFailed.as_str()).increment(1);
    }

    pub fn field_notice(field: &'static str) {
        ::metrics::counter!(MetricName::FieldNotices.as_str(), "field" => field).increment(1);
    }

    pub fn malformed(count: usize) {
        ::metrics::counter!(MetricName::MalformedRecords.as_str()).increment(count as u64);
    }

    pub fn write_duration(secs: f64) {
        ::metrics::histogram!(MetricName::WriteDuration.as_str()).record(secs);
    }
}

pub fn run_duration(secs: f64) {
    ::metrics::histogram!(MetricName::RunDuration.as_str()).record(secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_follow_convention() {
        for metric in MetricName::all_metrics() {
            assert!(metric.as_str().starts_with("pantry_"));
            assert_eq!(metric.to_string(), metric.as_str());
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        rows::seen();
        rows::field_notice("quantity");
        run_duration(0.5);
    }
}
