use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, StationError};

/// One tabulated pressure level and the correction constant stored for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureLevel {
    pub pressure: f64,
    pub constant: f64,
}

impl PressureLevel {
    pub fn new(pressure: f64, constant: f64) -> Self {
        Self { pressure, constant }
    }
}

/// Station pressure reduction table keyed by integer dry-bulb.
///
/// Levels inside each row are kept in ascending pressure order; the lookups
/// depend on that ordering for their tie-breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct StationPressureTable {
    rows: BTreeMap<i32, Vec<PressureLevel>>,
}

impl StationPressureTable {
    pub fn new(mut rows: BTreeMap<i32, Vec<PressureLevel>>) -> Result<Self> {
        for (dry_bulb, levels) in rows.iter_mut() {
            if levels
                .iter()
                .any(|l| !l.pressure.is_finite() || !l.constant.is_finite())
            {
                return Err(StationError::InvalidFormat(format!(
                    "Station pressure row {} contains a non-finite value",
                    dry_bulb
                )));
            }
            levels.sort_by(|a, b| a.pressure.total_cmp(&b.pressure));
            if levels.windows(2).any(|w| w[0].pressure == w[1].pressure) {
                return Err(StationError::InvalidFormat(format!(
                    "Station pressure row {} repeats a pressure level",
                    dry_bulb
                )));
            }
        }

        Ok(Self { rows })
    }

    pub fn row(&self, dry_bulb: i32) -> Option<&[PressureLevel]> {
        self.rows.get(&dry_bulb).map(Vec::as_slice)
    }

    pub fn dry_bulbs(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Lowest and highest pressure level across all rows.
    pub fn pressure_span(&self) -> Option<(f64, f64)> {
        let mut levels = self.rows.values().flatten().map(|l| l.pressure);
        let first = levels.next()?;
        Some(levels.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_sorted_on_construction() {
        let mut rows = BTreeMap::new();
        rows.insert(
            20,
            vec![
                PressureLevel::new(1010.0, 1.2),
                PressureLevel::new(1000.0, 1.1),
                PressureLevel::new(1005.0, 1.15),
            ],
        );
        let table = StationPressureTable::new(rows).unwrap();
        let pressures: Vec<f64> = table.row(20).unwrap().iter().map(|l| l.pressure).collect();
        assert_eq!(pressures, vec![1000.0, 1005.0, 1010.0]);
        assert_eq!(table.pressure_span(), Some((1000.0, 1010.0)));
    }

    #[test]
    fn test_rejects_duplicate_level() {
        let mut rows = BTreeMap::new();
        rows.insert(
            20,
            vec![
                PressureLevel::new(1000.0, 1.1),
                PressureLevel::new(1000.0, 1.2),
            ],
        );
        assert!(StationPressureTable::new(rows).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let mut rows = BTreeMap::new();
        rows.insert(20, vec![PressureLevel::new(1000.0, f64::NAN)]);
        assert!(StationPressureTable::new(rows).is_err());
    }

    #[test]
    fn test_missing_row() {
        let table = StationPressureTable::new(BTreeMap::new()).unwrap();
        assert!(table.row(20).is_none());
        assert_eq!(table.pressure_span(), None);
    }
}
