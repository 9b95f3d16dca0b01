use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::error::{Result, StationError};
use crate::utils::rounding::tenths_to_degrees;

/// Dew point and relative humidity stored at one (dry-bulb, difference) intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HygrometricCell {
    pub dew_point: f64,
    pub relative_humidity: f64,
}

impl HygrometricCell {
    pub fn new(dew_point: f64, relative_humidity: f64) -> Self {
        Self {
            dew_point,
            relative_humidity,
        }
    }
}

/// Psychrometric lookup table keyed by integer dry-bulb and the dry/wet-bulb
/// difference in tenths of a degree.
///
/// Every row carries one slot per difference on the axis. A `None` slot is a
/// combination the table leaves blank (the air cannot be that dry).
#[derive(Debug, Clone, PartialEq)]
pub struct HygrometricTable {
    differences: Vec<u32>,
    rows: BTreeMap<i32, Vec<Option<HygrometricCell>>>,
}

impl HygrometricTable {
    pub fn new(
        differences: Vec<u32>,
        rows: BTreeMap<i32, Vec<Option<HygrometricCell>>>,
    ) -> Result<Self> {
        if differences.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StationError::InvalidFormat(
                "Hygrometric difference axis must be strictly ascending".to_string(),
            ));
        }

        for (dry_bulb, cells) in &rows {
            if cells.len() != differences.len() {
                return Err(StationError::InvalidFormat(format!(
                    "Hygrometric row {} has {} cells, expected {}",
                    dry_bulb,
                    cells.len(),
                    differences.len()
                )));
            }
        }

        Ok(Self { differences, rows })
    }

    /// Ordered difference axis, in tenths of a degree.
    pub fn differences(&self) -> &[u32] {
        &self.differences
    }

    pub fn difference_index(&self, tenths: u32) -> Option<usize> {
        self.differences.binary_search(&tenths).ok()
    }

    pub fn row(&self, dry_bulb: i32) -> Option<&[Option<HygrometricCell>]> {
        self.rows.get(&dry_bulb).map(Vec::as_slice)
    }

    pub fn cell(&self, dry_bulb: i32, tenths: u32) -> Option<HygrometricCell> {
        let index = self.difference_index(tenths)?;
        self.row(dry_bulb)?.get(index).copied().flatten()
    }

    pub fn dry_bulb_range(&self) -> Option<RangeInclusive<i32>> {
        let min = *self.rows.keys().next()?;
        let max = *self.rows.keys().next_back()?;
        Some(min..=max)
    }

    pub fn max_difference(&self) -> Option<u32> {
        self.differences.last().copied()
    }

    pub fn max_difference_degrees(&self) -> Option<f64> {
        self.max_difference().map(tenths_to_degrees)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn filled_cell_count(&self) -> usize {
        self.rows
            .values()
            .map(|cells| cells.iter().filter(|c| c.is_some()).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> HygrometricTable {
        let mut rows = BTreeMap::new();
        rows.insert(
            10,
            vec![
                Some(HygrometricCell::new(10.0, 100.0)),
                Some(HygrometricCell::new(9.8, 99.0)),
                None,
            ],
        );
        rows.insert(
            11,
            vec![
                Some(HygrometricCell::new(11.0, 100.0)),
                Some(HygrometricCell::new(10.8, 99.0)),
                Some(HygrometricCell::new(6.1, 72.0)),
            ],
        );
        HygrometricTable::new(vec![0, 1, 30], rows).unwrap()
    }

    #[test]
    fn test_cell_lookup() {
        let table = small_table();
        assert_eq!(table.cell(11, 30), Some(HygrometricCell::new(6.1, 72.0)));
        assert_eq!(table.cell(10, 30), None);
        assert_eq!(table.cell(10, 2), None);
        assert_eq!(table.cell(12, 0), None);
    }

    #[test]
    fn test_coverage() {
        let table = small_table();
        assert_eq!(table.dry_bulb_range(), Some(10..=11));
        assert_eq!(table.max_difference(), Some(30));
        assert_eq!(table.max_difference_degrees(), Some(3.0));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.filled_cell_count(), 5);
    }

    #[test]
    fn test_rejects_unsorted_axis() {
        assert!(HygrometricTable::new(vec![0, 2, 1], BTreeMap::new()).is_err());
        assert!(HygrometricTable::new(vec![0, 0], BTreeMap::new()).is_err());
    }

    #[test]
    fn test_rejects_short_row() {
        let mut rows = BTreeMap::new();
        rows.insert(5, vec![None]);
        assert!(HygrometricTable::new(vec![0, 1], rows).is_err());
    }
}
