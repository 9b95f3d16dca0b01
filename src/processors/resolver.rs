use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    DerivedPressure, DerivedValues, HumidityReading, HygrometricTable, ObservationInput,
    PressureLevel, StationPressureTable,
};
use crate::readers::ReferenceTables;
use crate::utils::constants::SEA_LEVEL_LOOKUP_STEP;
use crate::utils::rounding::{
    difference_in_tenths, round_2dp, round_to_int, round_to_multiple, tenths_to_degrees,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("{field} reading is missing")]
    MissingInput { field: &'static str },

    #[error("{field} reading '{value}' is not a number")]
    InvalidReading { field: &'static str, value: String },

    #[error("Temperature values are outside the range of the hygrometric table ({detail})")]
    OutOfRange { detail: String },

    #[error("{detail}")]
    LookupMiss { detail: String },
}

impl ResolveError {
    fn lookup_miss(detail: impl Into<String>) -> Self {
        ResolveError::LookupMiss {
            detail: detail.into(),
        }
    }

    fn out_of_range(detail: impl Into<String>) -> Self {
        ResolveError::OutOfRange {
            detail: detail.into(),
        }
    }

    /// Missing input is not worth telling the observer about; they are
    /// still typing.
    pub fn is_silent(&self) -> bool {
        matches!(self, ResolveError::MissingInput { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::MissingInput { .. } => "missing_input",
            ResolveError::InvalidReading { .. } => "invalid_reading",
            ResolveError::OutOfRange { .. } => "out_of_range",
            ResolveError::LookupMiss { .. } => "lookup_miss",
        }
    }
}

/// Parse a reading typed into the form. Blank text is an absent reading.
pub fn parse_reading(field: &'static str, text: &str) -> Result<Option<f64>, ResolveError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ResolveError::InvalidReading {
            field,
            value: trimmed.to_string(),
        }),
    }
}

fn require(field: &'static str, value: Option<f64>) -> Result<f64, ResolveError> {
    let value = value.ok_or(ResolveError::MissingInput { field })?;
    if !value.is_finite() {
        return Err(ResolveError::InvalidReading {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Both lookups for one observation, each failing independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedObservation {
    pub humidity: Result<HumidityReading, ResolveError>,
    pub pressure: Result<DerivedPressure, ResolveError>,
}

impl ResolvedObservation {
    pub fn derived(&self) -> DerivedValues {
        DerivedValues {
            humidity: self.humidity.as_ref().ok().copied(),
            pressure: self.pressure.as_ref().ok().copied(),
        }
    }

    pub fn first_error(&self) -> Option<&ResolveError> {
        self.humidity
            .as_ref()
            .err()
            .or_else(|| self.pressure.as_ref().err())
    }
}

/// Looks up dew point, relative humidity and the pressure reductions from
/// the reference tables. Holds no state besides the tables; every call is a
/// fresh lookup.
#[derive(Debug, Clone)]
pub struct DerivedValueResolver {
    hygrometric: Arc<HygrometricTable>,
    station_pressure: Arc<StationPressureTable>,
}

impl DerivedValueResolver {
    pub fn new(tables: &ReferenceTables) -> Self {
        Self {
            hygrometric: Arc::clone(&tables.hygrometric),
            station_pressure: Arc::clone(&tables.station_pressure),
        }
    }

    pub fn from_tables(hygrometric: HygrometricTable, station_pressure: StationPressureTable) -> Self {
        Self {
            hygrometric: Arc::new(hygrometric),
            station_pressure: Arc::new(station_pressure),
        }
    }

    pub fn hygrometric_table(&self) -> &HygrometricTable {
        &self.hygrometric
    }

    pub fn station_pressure_table(&self) -> &StationPressureTable {
        &self.station_pressure
    }

    /// Dew point and relative humidity for a dry/wet-bulb pair.
    ///
    /// The dry-bulb is rounded to the nearest whole degree and the difference
    /// to one decimal; the difference must then sit exactly on the table's
    /// axis. There is no interpolation.
    pub fn resolve_humidity(
        &self,
        dry_bulb: Option<f64>,
        wet_bulb: Option<f64>,
    ) -> Result<HumidityReading, ResolveError> {
        let dry_bulb = require("Dry-bulb", dry_bulb)?;
        let wet_bulb = require("Wet-bulb", wet_bulb)?;

        let table = &self.hygrometric;
        let range = table
            .dry_bulb_range()
            .ok_or_else(|| ResolveError::lookup_miss("Hygrometric table has no rows"))?;
        let max_difference = table
            .max_difference()
            .ok_or_else(|| ResolveError::lookup_miss("Hygrometric table has no differences"))?;

        let tenths = difference_in_tenths(dry_bulb, wet_bulb)
            .ok_or_else(|| ResolveError::out_of_range("difference too large"))?;
        let key = round_to_int(dry_bulb)
            .ok_or_else(|| ResolveError::out_of_range("dry-bulb not representable"))?;

        if !range.contains(&key) {
            return Err(ResolveError::out_of_range(format!(
                "dry-bulb {} °C, table covers {}..={} °C",
                key,
                range.start(),
                range.end()
            )));
        }
        if tenths > max_difference {
            return Err(ResolveError::out_of_range(format!(
                "difference {:.1} °C, table covers up to {:.1} °C",
                tenths_to_degrees(tenths),
                tenths_to_degrees(max_difference)
            )));
        }

        let index = table
            .difference_index(tenths)
            .ok_or_else(|| ResolveError::lookup_miss("Invalid temperature difference for lookup"))?;

        let cell = table
            .row(key)
            .and_then(|row| row.get(index).copied().flatten())
            .ok_or_else(|| {
                ResolveError::lookup_miss(
                    "Could not find matching dry bulb temperature or difference in the table",
                )
            })?;

        debug!(
            dry_bulb,
            wet_bulb,
            key,
            difference = tenths_to_degrees(tenths),
            dew_point = cell.dew_point,
            relative_humidity = cell.relative_humidity,
            "Resolved humidity"
        );

        Ok(HumidityReading {
            dry_bulb_key: key,
            difference: tenths_to_degrees(tenths),
            dew_point: cell.dew_point,
            relative_humidity: cell.relative_humidity,
        })
    }

    /// Height correction, station level pressure, sea-level reduction
    /// constant and sea-level pressure for a barometer reading.
    pub fn resolve_pressure(
        &self,
        dry_bulb: Option<f64>,
        bar_as_read: Option<f64>,
    ) -> Result<DerivedPressure, ResolveError> {
        let dry_bulb = require("Dry-bulb", dry_bulb)?;
        let bar_as_read = require("Bar as read", bar_as_read)?;

        let key = round_to_int(dry_bulb).ok_or_else(|| {
            ResolveError::lookup_miss("Dry-bulb temperature not found in station pressure table")
        })?;

        let levels = self
            .station_pressure
            .row(key)
            .filter(|levels| !levels.is_empty())
            .ok_or_else(|| {
                ResolveError::lookup_miss(format!(
                    "Temperature {}°C not found in station pressure table",
                    key
                ))
            })?;

        let correction = nearest_level(levels, bar_as_read)
            .ok_or_else(|| ResolveError::lookup_miss("No pressure level for height correction"))?;
        let station_level_pressure = bar_as_read + correction.constant;

        let lookup_pressure = round_to_multiple(station_level_pressure, SEA_LEVEL_LOOKUP_STEP);
        let reduction = first_level_at_or_above(levels, lookup_pressure).ok_or_else(|| {
            ResolveError::lookup_miss("Could not find sea level reduction constant in table")
        })?;
        let sea_level_pressure = station_level_pressure + reduction.constant;

        debug!(
            key,
            bar_as_read,
            correction_level = correction.pressure,
            lookup_pressure,
            reduction_level = reduction.pressure,
            "Resolved station pressure"
        );

        Ok(DerivedPressure {
            height_difference_correction: round_2dp(correction.constant),
            station_level_pressure: round_2dp(station_level_pressure),
            sea_level_reduction_constant: round_2dp(reduction.constant),
            sea_level_pressure: round_2dp(sea_level_pressure),
            correction_level: correction.pressure,
            reduction_level: reduction.pressure,
        })
    }

    pub fn resolve(&self, input: &ObservationInput) -> ResolvedObservation {
        ResolvedObservation {
            humidity: self.resolve_humidity(input.dry_bulb, input.wet_bulb),
            pressure: self.resolve_pressure(input.dry_bulb, input.bar_as_read),
        }
    }
}

/// Level closest to `pressure`; on a tie the lower level wins.
fn nearest_level(levels: &[PressureLevel], pressure: f64) -> Option<&PressureLevel> {
    let mut best = levels.first()?;
    let mut best_distance = (best.pressure - pressure).abs();
    for level in &levels[1..] {
        let distance = (level.pressure - pressure).abs();
        if distance < best_distance {
            best = level;
            best_distance = distance;
        }
    }
    Some(best)
}

/// First level at or above `pressure`, else the highest level.
fn first_level_at_or_above(levels: &[PressureLevel], pressure: f64) -> Option<&PressureLevel> {
    levels
        .iter()
        .find(|level| level.pressure >= pressure)
        .or_else(|| levels.last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::{HygrometricReader, PressureReader};
    use pretty_assertions::assert_eq;

    fn embedded_resolver() -> DerivedValueResolver {
        DerivedValueResolver::new(&ReferenceTables::embedded().unwrap())
    }

    fn resolver_with_pressure(csv: &str) -> DerivedValueResolver {
        DerivedValueResolver::from_tables(
            HygrometricReader::new().read_embedded().unwrap(),
            PressureReader::new().read_from(csv.as_bytes()).unwrap(),
        )
    }

    #[test]
    fn test_humidity_exact_cell() {
        let resolver = embedded_resolver();
        let reading = resolver.resolve_humidity(Some(25.0), Some(22.0)).unwrap();
        assert_eq!(
            reading,
            HumidityReading {
                dry_bulb_key: 25,
                difference: 3.0,
                dew_point: 20.7,
                relative_humidity: 77.0,
            }
        );
    }

    #[test]
    fn test_humidity_rounds_dry_bulb_and_difference() {
        let resolver = embedded_resolver();
        // 20.4 rounds to 20, |20.4 - 18.1| = 2.3
        let reading = resolver.resolve_humidity(Some(20.4), Some(18.1)).unwrap();
        assert_eq!(reading.dry_bulb_key, 20);
        assert_eq!(reading.difference, 2.3);
        assert_eq!(reading.dew_point, 16.4);
        assert_eq!(reading.relative_humidity, 80.0);
    }

    #[test]
    fn test_humidity_every_filled_cell() {
        let resolver = embedded_resolver();
        let table = resolver.hygrometric_table();
        let range = table.dry_bulb_range().unwrap();

        let mut checked = 0;
        for key in range {
            for &tenths in table.differences() {
                let Some(expected) = table.cell(key, tenths) else {
                    continue;
                };
                let dry = key as f64;
                let wet = dry - tenths_to_degrees(tenths);
                let reading = resolver.resolve_humidity(Some(dry), Some(wet)).unwrap();
                assert_eq!(reading.dew_point, expected.dew_point);
                assert_eq!(reading.relative_humidity, expected.relative_humidity);
                checked += 1;
            }
        }
        assert_eq!(checked, table.filled_cell_count());
    }

    #[test]
    fn test_humidity_difference_beyond_table() {
        let resolver = embedded_resolver();
        let err = resolver.resolve_humidity(Some(20.0), Some(60.0)).unwrap_err();
        assert_eq!(err.kind(), "out_of_range");
    }

    #[test]
    fn test_humidity_dry_bulb_beyond_table() {
        let resolver = embedded_resolver();
        let err = resolver.resolve_humidity(Some(50.6), Some(45.0)).unwrap_err();
        assert!(matches!(err, ResolveError::OutOfRange { .. }));

        let err = resolver.resolve_humidity(Some(-0.6), Some(-1.0)).unwrap_err();
        assert!(matches!(err, ResolveError::OutOfRange { .. }));
    }

    #[test]
    fn test_humidity_negative_half_rounds_up() {
        let resolver = embedded_resolver();
        let reading = resolver.resolve_humidity(Some(-0.5), Some(-0.5)).unwrap();
        assert_eq!(reading.dry_bulb_key, 0);
    }

    #[test]
    fn test_humidity_blank_cell_is_lookup_miss() {
        let resolver = embedded_resolver();
        // 0 °C with a 6.0 °C depression is left blank in the table
        let err = resolver.resolve_humidity(Some(0.0), Some(-6.0)).unwrap_err();
        assert_eq!(err.kind(), "lookup_miss");
    }

    #[test]
    fn test_humidity_difference_off_axis() {
        let hygrometric = HygrometricReader::new()
            .read_from("dry_bulb,0.0,0.5\n20,20.0/100,19.3/95\n".as_bytes())
            .unwrap();
        let resolver = DerivedValueResolver::from_tables(
            hygrometric,
            PressureReader::new().read_embedded().unwrap(),
        );
        let err = resolver.resolve_humidity(Some(20.0), Some(19.8)).unwrap_err();
        assert_eq!(
            err,
            ResolveError::LookupMiss {
                detail: "Invalid temperature difference for lookup".to_string()
            }
        );
    }

    #[test]
    fn test_humidity_missing_input_is_silent() {
        let resolver = embedded_resolver();
        let err = resolver.resolve_humidity(Some(25.0), None).unwrap_err();
        assert!(err.is_silent());
        let err = resolver.resolve_humidity(None, Some(22.0)).unwrap_err();
        assert!(err.is_silent());
    }

    #[test]
    fn test_pressure_reference_case() {
        let resolver = embedded_resolver();
        let pressure = resolver.resolve_pressure(Some(25.0), Some(1010.0)).unwrap();
        assert_eq!(
            pressure,
            DerivedPressure {
                height_difference_correction: 1.16,
                station_level_pressure: 1011.16,
                sea_level_reduction_constant: 1.16,
                sea_level_pressure: 1012.32,
                correction_level: 1010.0,
                reduction_level: 1010.0,
            }
        );
    }

    #[test]
    fn test_pressure_tie_prefers_lower_level() {
        let resolver = resolver_with_pressure("dry_bulb,1000,1010\n20,0.40,0.90\n");
        let pressure = resolver.resolve_pressure(Some(20.0), Some(1005.0)).unwrap();
        assert_eq!(pressure.correction_level, 1000.0);
        assert_eq!(pressure.height_difference_correction, 0.4);
        // 1005.4 rounds to 1005, first level at or above is 1010
        assert_eq!(pressure.reduction_level, 1010.0);
        assert_eq!(pressure.sea_level_pressure, 1006.3);
    }

    #[test]
    fn test_pressure_falls_back_to_highest_level() {
        let resolver = resolver_with_pressure("dry_bulb,1000,1005\n20,3.00,4.00\n");
        let pressure = resolver.resolve_pressure(Some(20.2), Some(1009.0)).unwrap();
        assert_eq!(pressure.correction_level, 1005.0);
        assert_eq!(pressure.station_level_pressure, 1013.0);
        // 1013 rounds to 1015, above every level
        assert_eq!(pressure.reduction_level, 1005.0);
        assert_eq!(pressure.sea_level_pressure, 1017.0);
    }

    #[test]
    fn test_pressure_rounds_to_two_decimals() {
        let resolver = resolver_with_pressure("dry_bulb,1000\n20,1.234\n");
        let pressure = resolver.resolve_pressure(Some(20.0), Some(1000.0)).unwrap();
        assert_eq!(pressure.height_difference_correction, 1.23);
        assert_eq!(pressure.station_level_pressure, 1001.23);
        assert_eq!(pressure.sea_level_reduction_constant, 1.23);
        assert_eq!(pressure.sea_level_pressure, 1002.47);
    }

    #[test]
    fn test_pressure_unknown_temperature() {
        let resolver = embedded_resolver();
        let err = resolver.resolve_pressure(Some(51.0), Some(1010.0)).unwrap_err();
        assert_eq!(
            err,
            ResolveError::LookupMiss {
                detail: "Temperature 51°C not found in station pressure table".to_string()
            }
        );
    }

    #[test]
    fn test_pressure_missing_barometer() {
        let resolver = embedded_resolver();
        let err = resolver.resolve_pressure(Some(25.0), None).unwrap_err();
        assert!(err.is_silent());
    }

    #[test]
    fn test_resolvers_are_idempotent() {
        let resolver = embedded_resolver();
        let input = ObservationInput::new(Some(27.3), Some(24.1), Some(1003.7));
        let first = resolver.resolve(&input);
        let second = resolver.resolve(&input);
        assert_eq!(first, second);
        assert!(first.first_error().is_none());
        assert!(!first.derived().is_empty());
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading("Dry-bulb", " 25.4 "), Ok(Some(25.4)));
        assert_eq!(parse_reading("Dry-bulb", "   "), Ok(None));
        assert_eq!(
            parse_reading("Dry-bulb", "25,4"),
            Err(ResolveError::InvalidReading {
                field: "Dry-bulb",
                value: "25,4".to_string()
            })
        );
        assert!(parse_reading("Dry-bulb", "NaN").is_err());
        assert!(parse_reading("Dry-bulb", "inf").is_err());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let resolver = embedded_resolver();
        let err = resolver.resolve_humidity(Some(f64::NAN), Some(20.0)).unwrap_err();
        assert_eq!(err.kind(), "invalid_reading");
    }
}
