use serde::{Deserialize, Serialize};

/// Raw readings as entered at the station. Any of them may still be blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationInput {
    pub dry_bulb: Option<f64>,
    pub wet_bulb: Option<f64>,
    pub bar_as_read: Option<f64>,
}

impl ObservationInput {
    pub fn new(dry_bulb: Option<f64>, wet_bulb: Option<f64>, bar_as_read: Option<f64>) -> Self {
        Self {
            dry_bulb,
            wet_bulb,
            bar_as_read,
        }
    }
}

/// Result of a hygrometric lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityReading {
    /// Dry-bulb rounded to the table row that was used
    pub dry_bulb_key: i32,
    /// |dry - wet| to one decimal
    pub difference: f64,
    pub dew_point: f64,
    pub relative_humidity: f64,
}

/// Result of the two-step station pressure lookup, all values in hPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPressure {
    pub height_difference_correction: f64,
    pub station_level_pressure: f64,
    pub sea_level_reduction_constant: f64,
    pub sea_level_pressure: f64,
    /// Table level nearest to the barometer reading
    pub correction_level: f64,
    /// Table level used for the sea-level reduction constant
    pub reduction_level: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    pub humidity: Option<HumidityReading>,
    pub pressure: Option<DerivedPressure>,
}

impl DerivedValues {
    pub fn is_empty(&self) -> bool {
        self.humidity.is_none() && self.pressure.is_none()
    }
}

/// One line of a batch observation file. Readings stay as text so a bad
/// value fails only its own row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationRow {
    pub station_no: String,
    pub observed_at: String,
    pub dry_bulb: String,
    pub wet_bulb: String,
    pub bar_as_read: String,
}

/// An observation row with its derived values, as written by `derive`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub station_no: String,
    pub observed_at: String,
    pub dry_bulb: String,
    pub wet_bulb: String,
    pub bar_as_read: String,
    pub difference: Option<f64>,
    pub dew_point: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub height_difference_correction: Option<f64>,
    pub station_level_pressure: Option<f64>,
    pub sea_level_reduction_constant: Option<f64>,
    pub sea_level_pressure: Option<f64>,
    pub status: String,
    pub message: String,
}

impl DerivedRecord {
    pub fn from_row(row: &ObservationRow) -> Self {
        Self {
            station_no: row.station_no.clone(),
            observed_at: row.observed_at.clone(),
            dry_bulb: row.dry_bulb.clone(),
            wet_bulb: row.wet_bulb.clone(),
            bar_as_read: row.bar_as_read.clone(),
            ..Self::default()
        }
    }

    pub fn apply_humidity(&mut self, reading: &HumidityReading) {
        self.difference = Some(reading.difference);
        self.dew_point = Some(reading.dew_point);
        self.relative_humidity = Some(reading.relative_humidity);
    }

    pub fn apply_pressure(&mut self, pressure: &DerivedPressure) {
        self.height_difference_correction = Some(pressure.height_difference_correction);
        self.station_level_pressure = Some(pressure.station_level_pressure);
        self.sea_level_reduction_constant = Some(pressure.sea_level_reduction_constant);
        self.sea_level_pressure = Some(pressure.sea_level_pressure);
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
