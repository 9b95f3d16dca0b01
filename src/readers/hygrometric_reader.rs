use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, StationError};
use crate::models::{HygrometricCell, HygrometricTable};
use crate::utils::constants::{DRY_BULB_COLUMN, HYGROMETRIC_CELL_SEPARATOR, HYGROMETRIC_TABLE_CSV};
use crate::utils::rounding::parse_tenths;

/// Reads the wide hygrometric CSV: a `dry_bulb` column followed by one column
/// per difference, cells written as `dew_point/relative_humidity`.
pub struct HygrometricReader;

impl HygrometricReader {
    pub fn new() -> Self {
        Self
    }

    /// Table compiled into the binary
    pub fn read_embedded(&self) -> Result<HygrometricTable> {
        self.read_from(HYGROMETRIC_TABLE_CSV.as_bytes())
    }

    pub fn read_table(&self, path: &Path) -> Result<HygrometricTable> {
        let file = File::open(path)?;
        self.read_from(file)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<HygrometricTable> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let differences = parse_difference_axis(&headers)?;

        let mut rows = BTreeMap::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let dry_bulb_text = record.get(0).unwrap_or("");
            let dry_bulb = dry_bulb_text.parse::<i32>().map_err(|_| {
                StationError::table_format(line, format!("Invalid dry-bulb key: '{}'", dry_bulb_text))
            })?;

            let cells = record
                .iter()
                .skip(1)
                .map(|cell| parse_cell(cell, line))
                .collect::<Result<Vec<_>>>()?;

            if rows.insert(dry_bulb, cells).is_some() {
                return Err(StationError::table_format(
                    line,
                    format!("Duplicate dry-bulb row {}", dry_bulb),
                ));
            }
        }

        let table = HygrometricTable::new(differences, rows)?;
        tracing::debug!(
            rows = table.row_count(),
            cells = table.filled_cell_count(),
            "Loaded hygrometric table"
        );
        Ok(table)
    }
}

impl Default for HygrometricReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_difference_axis(headers: &StringRecord) -> Result<Vec<u32>> {
    if headers.get(0) != Some(DRY_BULB_COLUMN) {
        return Err(StationError::table_format(
            1,
            format!("First column must be '{}'", DRY_BULB_COLUMN),
        ));
    }

    let differences = headers
        .iter()
        .skip(1)
        .map(|h| {
            parse_tenths(h).ok_or_else(|| {
                StationError::table_format(1, format!("Invalid difference header: '{}'", h))
            })
        })
        .collect::<Result<Vec<u32>>>()?;

    if differences.windows(2).any(|w| w[0] >= w[1]) {
        return Err(StationError::table_format(
            1,
            "Difference headers must be strictly ascending",
        ));
    }

    Ok(differences)
}

fn parse_cell(cell: &str, line: u64) -> Result<Option<HygrometricCell>> {
    if cell.is_empty() {
        return Ok(None);
    }

    let (dew_point, humidity) = cell
        .split_once(HYGROMETRIC_CELL_SEPARATOR)
        .ok_or_else(|| StationError::table_format(line, format!("Malformed cell: '{}'", cell)))?;

    let dew_point = dew_point.trim().parse::<f64>().map_err(|_| {
        StationError::table_format(line, format!("Invalid dew point in cell '{}'", cell))
    })?;
    let relative_humidity = humidity.trim().parse::<f64>().map_err(|_| {
        StationError::table_format(line, format!("Invalid relative humidity in cell '{}'", cell))
    })?;

    Ok(Some(HygrometricCell::new(dew_point, relative_humidity)))
}
