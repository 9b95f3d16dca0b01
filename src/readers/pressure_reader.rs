use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, StationError};
use crate::models::{PressureLevel, StationPressureTable};
use crate::utils::constants::{DRY_BULB_COLUMN, STATION_PRESSURE_CSV};

/// Reads the wide station pressure CSV: a `dry_bulb` column followed by one
/// column per pressure level (hPa). Blank cells mean the level is not
/// tabulated for that temperature.
pub struct PressureReader;

impl PressureReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_embedded(&self) -> Result<StationPressureTable> {
        self.read_from(STATION_PRESSURE_CSV.as_bytes())
    }

    pub fn read_table(&self, path: &Path) -> Result<StationPressureTable> {
        let file = File::open(path)?;
        self.read_from(file)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<StationPressureTable> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let levels = parse_level_axis(&headers)?;

        let mut rows = BTreeMap::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let dry_bulb_text = record.get(0).unwrap_or("");
            let dry_bulb = dry_bulb_text.parse::<i32>().map_err(|_| {
                StationError::table_format(line, format!("Invalid dry-bulb key: '{}'", dry_bulb_text))
            })?;

            let mut row = Vec::with_capacity(levels.len());
            for (&pressure, cell) in levels.iter().zip(record.iter().skip(1)) {
                if cell.is_empty() {
                    continue;
                }
                let constant = cell.parse::<f64>().map_err(|_| {
                    StationError::table_format(line, format!("Invalid constant: '{}'", cell))
                })?;
                row.push(PressureLevel::new(pressure, constant));
            }

            if rows.insert(dry_bulb, row).is_some() {
                return Err(StationError::table_format(
                    line,
                    format!("Duplicate dry-bulb row {}", dry_bulb),
                ));
            }
        }

        let table = StationPressureTable::new(rows)?;
        tracing::debug!(rows = table.row_count(), "Loaded station pressure table");
        Ok(table)
    }
}

impl Default for PressureReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level_axis(headers: &StringRecord) -> Result<Vec<f64>> {
    if headers.get(0) != Some(DRY_BULB_COLUMN) {
        return Err(StationError::table_format(
            1,
            format!("First column must be '{}'", DRY_BULB_COLUMN),
        ));
    }

    let levels = headers
        .iter()
        .skip(1)
        .map(|h| {
            h.parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p > 0.0)
                .ok_or_else(|| {
                    StationError::table_format(1, format!("Invalid pressure level header: '{}'", h))
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    let mut sorted = levels.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(StationError::table_format(1, "Duplicate pressure level header"));
    }

    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_sample() {
        let csv = "dry_bulb,1000,1005,1010\n25,1.15,1.15,1.16\n26,1.14,,1.16\n";
        let table = PressureReader::new().read_from(csv.as_bytes()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(25).unwrap().len(), 3);
        // Blank cell drops the level
        let pressures: Vec<f64> = table.row(26).unwrap().iter().map(|l| l.pressure).collect();
        assert_eq!(pressures, vec![1000.0, 1010.0]);
    }

    #[test]
    fn test_embedded_table() {
        let table = PressureReader::new().read_embedded().unwrap();
        assert_eq!(table.row_count(), 51);
        assert_eq!(table.pressure_span(), Some((950.0, 1050.0)));
        let row = table.row(25).unwrap();
        assert_eq!(row.len(), 21);
        assert_eq!(row[12], PressureLevel::new(1010.0, 1.16));
    }

    #[test]
    fn test_rejects_duplicate_level_header() {
        let err = PressureReader::new()
            .read_from("dry_bulb,1000,1000\n25,1.1,1.2\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, StationError::TableFormat { line: 1, .. }));
    }

    #[test]
    fn test_rejects_bad_constant() {
        let err = PressureReader::new()
            .read_from("dry_bulb,1000\n25,abc\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, StationError::TableFormat { line: 2, .. }));
    }
}
