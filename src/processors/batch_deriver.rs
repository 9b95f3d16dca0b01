use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{DerivedRecord, ObservationRow};
use crate::processors::resolver::{parse_reading, DerivedValueResolver, ResolveError};
use crate::utils::progress::ProgressReporter;

const STATUS_OK: &str = "ok";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub ok_rows: usize,
    pub failed_rows: usize,
    pub failures_by_kind: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    fn record(&mut self, failure: Option<&'static str>) {
        self.total_rows += 1;
        match failure {
            None => self.ok_rows += 1,
            Some(kind) => {
                self.failed_rows += 1;
                *self.failures_by_kind.entry(kind).or_default() += 1;
            }
        }
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Derivation Summary:".to_string(),
            format!("  Rows: {}", self.total_rows),
            format!("  Derived: {}", self.ok_rows),
            format!("  Failed: {}", self.failed_rows),
        ];
        for (kind, count) in &self.failures_by_kind {
            lines.push(format!("    {}: {}", kind, count));
        }
        lines.join("\n")
    }
}

/// Runs both lookups over every row of an observation file.
pub struct BatchDeriver {
    resolver: DerivedValueResolver,
}

impl BatchDeriver {
    pub fn new(resolver: DerivedValueResolver) -> Self {
        Self { resolver }
    }

    /// Resolve one row. Failures end up in the record's status and message.
    pub fn derive_row(&self, row: &ObservationRow) -> DerivedRecord {
        self.derive_row_with_kind(row).0
    }

    fn derive_row_with_kind(&self, row: &ObservationRow) -> (DerivedRecord, Option<&'static str>) {
        let mut record = DerivedRecord::from_row(row);

        let dry = parse_reading("Dry-bulb", &row.dry_bulb);
        let wet = parse_reading("Wet-bulb", &row.wet_bulb);
        let bar = parse_reading("Bar as read", &row.bar_as_read);

        let humidity = dry
            .clone()
            .and_then(|dry| Ok((dry, wet?)))
            .and_then(|(dry, wet)| self.resolver.resolve_humidity(dry, wet));
        let pressure = dry
            .and_then(|dry| Ok((dry, bar?)))
            .and_then(|(dry, bar)| self.resolver.resolve_pressure(dry, bar));

        let mut first_error: Option<ResolveError> = None;
        match humidity {
            Ok(reading) => record.apply_humidity(&reading),
            Err(err) => first_error = Some(err),
        }
        match pressure {
            Ok(derived) => record.apply_pressure(&derived),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            None => {
                record.status = STATUS_OK.to_string();
                (record, None)
            }
            Some(err) => {
                warn!(
                    station_no = %row.station_no,
                    observed_at = %row.observed_at,
                    kind = err.kind(),
                    "Row not fully derived: {}",
                    err
                );
                record.status = err.kind().to_string();
                record.message = err.to_string();
                (record, Some(err.kind()))
            }
        }
    }

    pub fn derive_all(
        &self,
        rows: &[ObservationRow],
        progress: Option<&ProgressReporter>,
    ) -> (Vec<DerivedRecord>, BatchSummary) {
        if let Some(p) = progress {
            p.set_message("Deriving humidity and pressure...");
        }

        let mut summary = BatchSummary::default();
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let (record, kind) = self.derive_row_with_kind(row);
            summary.record(kind);
            records.push(record);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Derived {} rows", summary.total_rows));
        }

        (records, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::ReferenceTables;
    use pretty_assertions::assert_eq;

    fn deriver() -> BatchDeriver {
        let tables = ReferenceTables::embedded().unwrap();
        BatchDeriver::new(DerivedValueResolver::new(&tables))
    }

    fn row(dry: &str, wet: &str, bar: &str) -> ObservationRow {
        ObservationRow {
            station_no: "41923".to_string(),
            observed_at: "2024-06-01T06:00".to_string(),
            dry_bulb: dry.to_string(),
            wet_bulb: wet.to_string(),
            bar_as_read: bar.to_string(),
        }
    }

    #[test]
    fn test_complete_row() {
        let record = deriver().derive_row(&row("25", "22", "1010"));
        assert_eq!(record.status, "ok");
        assert_eq!(record.message, "");
        assert_eq!(record.difference, Some(3.0));
        assert_eq!(record.dew_point, Some(20.7));
        assert_eq!(record.relative_humidity, Some(77.0));
        assert_eq!(record.height_difference_correction, Some(1.16));
        assert_eq!(record.sea_level_pressure, Some(1012.32));
    }

    #[test]
    fn test_partial_row_keeps_what_resolved() {
        let record = deriver().derive_row(&row("25", "22", ""));
        assert_eq!(record.status, "missing_input");
        assert_eq!(record.dew_point, Some(20.7));
        assert_eq!(record.station_level_pressure, None);
    }

    #[test]
    fn test_humidity_failure_reported_first() {
        let record = deriver().derive_row(&row("20", "60", "1010"));
        assert_eq!(record.status, "out_of_range");
        assert!(record.message.contains("hygrometric table"));
        // Pressure still resolves
        assert!(record.sea_level_pressure.is_some());
    }

    #[test]
    fn test_bad_row_does_not_stop_batch() {
        let rows = vec![
            row("25", "22", "1010"),
            row("abc", "22", "1010"),
            row("20", "17.7", "1002.5"),
        ];
        let (records, summary) = deriver().derive_all(&rows, None);

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].status, "invalid_reading");
        assert!(records[2].is_ok());
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.ok_rows, 2);
        assert_eq!(summary.failed_rows, 1);
        assert_eq!(summary.failures_by_kind.get("invalid_reading"), Some(&1));
        assert!(summary.summary().contains("Failed: 1"));
    }
}
