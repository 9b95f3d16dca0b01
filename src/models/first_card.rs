use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::station::StationHeader;

/// Tabs of the first card, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormTab {
    Temperature,
    Pressure,
    Squall,
    Visibility,
    Weather,
    Indicators,
}

impl FormTab {
    pub const ORDER: [FormTab; 6] = [
        FormTab::Temperature,
        FormTab::Pressure,
        FormTab::Squall,
        FormTab::Visibility,
        FormTab::Weather,
        FormTab::Indicators,
    ];

    pub fn index(&self) -> usize {
        // ORDER lists every variant
        FormTab::ORDER.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> FormTab {
        FormTab::ORDER
            .get(self.index() + 1)
            .copied()
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> FormTab {
        match self.index() {
            0 => *self,
            i => FormTab::ORDER[i - 1],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FormTab::Temperature => "Temperature",
            FormTab::Pressure => "Bar Pressure",
            FormTab::Squall => "Squall",
            FormTab::Visibility => "VV",
            FormTab::Weather => "Weather",
            FormTab::Indicators => "Indicators",
        }
    }
}

impl fmt::Display for FormTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Confirm/skip gate in front of the squall measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquallStep {
    Pending,
    Confirmed,
    Skipped,
}

impl SquallStep {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => SquallStep::Pending,
            Some(true) => SquallStep::Confirmed,
            Some(false) => SquallStep::Skipped,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SquallStep::Pending => None,
            SquallStep::Confirmed => Some(true),
            SquallStep::Skipped => Some(false),
        }
    }
}

/// Every free-text field on the first card, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirstCardField {
    StationName,
    // Bar pressure
    SubIndicator,
    AlteredThermometer,
    BarAsRead,
    CorrectedForIndex,
    HeightDifference,
    CorrectionForTemp,
    StationLevelPressure,
    SeaLevelReduction,
    CorrectedSeaLevelPressure,
    AfternoonReading,
    PressureChange24h,
    // Temperature
    DryBulbAsRead,
    WetBulbAsRead,
    MaxMinTempAsRead,
    DryBulbCorrected,
    WetBulbCorrected,
    MaxMinTempCorrected,
    DewPoint,
    RelativeHumidity,
    // Squall
    SquallForce,
    SquallDirection,
    SquallTime,
    // Visibility
    HorizontalVisibility,
    MiscMeteors,
    // Weather
    PastWeatherW1,
    PastWeatherW2,
    PresentWeatherWw,
    // Indicators
    C2Indicator,
    ObservationTime,
}

impl FirstCardField {
    pub const ALL: [FirstCardField; 30] = [
        FirstCardField::StationName,
        FirstCardField::SubIndicator,
        FirstCardField::AlteredThermometer,
        FirstCardField::BarAsRead,
        FirstCardField::CorrectedForIndex,
        FirstCardField::HeightDifference,
        FirstCardField::CorrectionForTemp,
        FirstCardField::StationLevelPressure,
        FirstCardField::SeaLevelReduction,
        FirstCardField::CorrectedSeaLevelPressure,
        FirstCardField::AfternoonReading,
        FirstCardField::PressureChange24h,
        FirstCardField::DryBulbAsRead,
        FirstCardField::WetBulbAsRead,
        FirstCardField::MaxMinTempAsRead,
        FirstCardField::DryBulbCorrected,
        FirstCardField::WetBulbCorrected,
        FirstCardField::MaxMinTempCorrected,
        FirstCardField::DewPoint,
        FirstCardField::RelativeHumidity,
        FirstCardField::SquallForce,
        FirstCardField::SquallDirection,
        FirstCardField::SquallTime,
        FirstCardField::HorizontalVisibility,
        FirstCardField::MiscMeteors,
        FirstCardField::PastWeatherW1,
        FirstCardField::PastWeatherW2,
        FirstCardField::PresentWeatherWw,
        FirstCardField::C2Indicator,
        FirstCardField::ObservationTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FirstCardField::StationName => "stationName",
            FirstCardField::SubIndicator => "subIndicator",
            FirstCardField::AlteredThermometer => "alteredThermometer",
            FirstCardField::BarAsRead => "barAsRead",
            FirstCardField::CorrectedForIndex => "correctedForIndex",
            FirstCardField::HeightDifference => "heightDifference",
            FirstCardField::CorrectionForTemp => "correctionForTemp",
            FirstCardField::StationLevelPressure => "stationLevelPressure",
            FirstCardField::SeaLevelReduction => "seaLevelReduction",
            FirstCardField::CorrectedSeaLevelPressure => "correctedSeaLevelPressure",
            FirstCardField::AfternoonReading => "afternoonReading",
            FirstCardField::PressureChange24h => "pressureChange24h",
            FirstCardField::DryBulbAsRead => "dryBulbAsRead",
            FirstCardField::WetBulbAsRead => "wetBulbAsRead",
            FirstCardField::MaxMinTempAsRead => "maxMinTempAsRead",
            FirstCardField::DryBulbCorrected => "dryBulbCorrected",
            FirstCardField::WetBulbCorrected => "wetBulbCorrected",
            FirstCardField::MaxMinTempCorrected => "maxMinTempCorrected",
            FirstCardField::DewPoint => "Td",
            FirstCardField::RelativeHumidity => "relativeHumidity",
            FirstCardField::SquallForce => "squallForce",
            FirstCardField::SquallDirection => "squallDirection",
            FirstCardField::SquallTime => "squallTime",
            FirstCardField::HorizontalVisibility => "horizontalVisibility",
            FirstCardField::MiscMeteors => "miscMeteors",
            FirstCardField::PastWeatherW1 => "pastWeatherW1",
            FirstCardField::PastWeatherW2 => "pastWeatherW2",
            FirstCardField::PresentWeatherWw => "presentWeatherWW",
            FirstCardField::C2Indicator => "c2Indicator",
            FirstCardField::ObservationTime => "observationTime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FirstCardField::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Filled in by the table lookups, never typed by the observer.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            FirstCardField::HeightDifference
                | FirstCardField::StationLevelPressure
                | FirstCardField::SeaLevelReduction
                | FirstCardField::CorrectedSeaLevelPressure
                | FirstCardField::DewPoint
                | FirstCardField::RelativeHumidity
        )
    }

    pub fn is_squall(&self) -> bool {
        matches!(
            self,
            FirstCardField::SquallForce | FirstCardField::SquallDirection | FirstCardField::SquallTime
        )
    }

    /// Inputs of the hygrometric lookup.
    pub fn triggers_humidity(&self) -> bool {
        matches!(
            self,
            FirstCardField::DryBulbAsRead | FirstCardField::WetBulbAsRead
        )
    }

    /// Inputs of the station pressure lookup.
    pub fn triggers_pressure(&self) -> bool {
        matches!(self, FirstCardField::DryBulbAsRead | FirstCardField::BarAsRead)
    }

    pub fn tab(&self) -> Option<FormTab> {
        use FirstCardField::*;
        match self {
            StationName => None,
            SubIndicator | AlteredThermometer | BarAsRead | CorrectedForIndex
            | HeightDifference | CorrectionForTemp | StationLevelPressure | SeaLevelReduction
            | CorrectedSeaLevelPressure | AfternoonReading | PressureChange24h => {
                Some(FormTab::Pressure)
            }
            DryBulbAsRead | WetBulbAsRead | MaxMinTempAsRead | DryBulbCorrected
            | WetBulbCorrected | MaxMinTempCorrected | DewPoint | RelativeHumidity => {
                Some(FormTab::Temperature)
            }
            SquallForce | SquallDirection | SquallTime => Some(FormTab::Squall),
            HorizontalVisibility | MiscMeteors => Some(FormTab::Visibility),
            PastWeatherW1 | PastWeatherW2 | PresentWeatherWw => Some(FormTab::Weather),
            C2Indicator | ObservationTime => Some(FormTab::Indicators),
        }
    }
}

impl fmt::Display for FirstCardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything typed on the first card, kept as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirstCardDraft {
    #[serde(flatten)]
    pub header: StationHeader,

    pub sub_indicator: String,
    pub altered_thermometer: String,
    pub bar_as_read: String,
    pub corrected_for_index: String,
    pub height_difference: String,
    pub correction_for_temp: String,
    pub station_level_pressure: String,
    pub sea_level_reduction: String,
    pub corrected_sea_level_pressure: String,
    pub afternoon_reading: String,
    pub pressure_change_24h: String,

    pub dry_bulb_as_read: String,
    pub wet_bulb_as_read: String,
    pub max_min_temp_as_read: String,
    pub dry_bulb_corrected: String,
    pub wet_bulb_corrected: String,
    pub max_min_temp_corrected: String,
    #[serde(rename = "Td")]
    pub dew_point: String,
    pub relative_humidity: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub squall_confirmed: Option<bool>,
    pub squall_force: String,
    pub squall_direction: String,
    pub squall_time: String,

    pub horizontal_visibility: String,
    pub misc_meteors: String,

    pub past_weather_w1: String,
    pub past_weather_w2: String,
    #[serde(rename = "presentWeatherWW")]
    pub present_weather_ww: String,

    pub c2_indicator: String,
    pub observation_time: String,
}

impl FirstCardDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FirstCardField) -> &str {
        self.slot(field)
    }

    pub fn set(&mut self, field: FirstCardField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    fn slot(&self, field: FirstCardField) -> &String {
        use FirstCardField::*;
        match field {
            StationName => &self.header.station_name,
            SubIndicator => &self.sub_indicator,
            AlteredThermometer => &self.altered_thermometer,
            BarAsRead => &self.bar_as_read,
            CorrectedForIndex => &self.corrected_for_index,
            HeightDifference => &self.height_difference,
            CorrectionForTemp => &self.correction_for_temp,
            StationLevelPressure => &self.station_level_pressure,
            SeaLevelReduction => &self.sea_level_reduction,
            CorrectedSeaLevelPressure => &self.corrected_sea_level_pressure,
            AfternoonReading => &self.afternoon_reading,
            PressureChange24h => &self.pressure_change_24h,
            DryBulbAsRead => &self.dry_bulb_as_read,
            WetBulbAsRead => &self.wet_bulb_as_read,
            MaxMinTempAsRead => &self.max_min_temp_as_read,
            DryBulbCorrected => &self.dry_bulb_corrected,
            WetBulbCorrected => &self.wet_bulb_corrected,
            MaxMinTempCorrected => &self.max_min_temp_corrected,
            DewPoint => &self.dew_point,
            RelativeHumidity => &self.relative_humidity,
            SquallForce => &self.squall_force,
            SquallDirection => &self.squall_direction,
            SquallTime => &self.squall_time,
            HorizontalVisibility => &self.horizontal_visibility,
            MiscMeteors => &self.misc_meteors,
            PastWeatherW1 => &self.past_weather_w1,
            PastWeatherW2 => &self.past_weather_w2,
            PresentWeatherWw => &self.present_weather_ww,
            C2Indicator => &self.c2_indicator,
            ObservationTime => &self.observation_time,
        }
    }

    fn slot_mut(&mut self, field: FirstCardField) -> &mut String {
        use FirstCardField::*;
        match field {
            StationName => &mut self.header.station_name,
            SubIndicator => &mut self.sub_indicator,
            AlteredThermometer => &mut self.altered_thermometer,
            BarAsRead => &mut self.bar_as_read,
            CorrectedForIndex => &mut self.corrected_for_index,
            HeightDifference => &mut self.height_difference,
            CorrectionForTemp => &mut self.correction_for_temp,
            StationLevelPressure => &mut self.station_level_pressure,
            SeaLevelReduction => &mut self.sea_level_reduction,
            CorrectedSeaLevelPressure => &mut self.corrected_sea_level_pressure,
            AfternoonReading => &mut self.afternoon_reading,
            PressureChange24h => &mut self.pressure_change_24h,
            DryBulbAsRead => &mut self.dry_bulb_as_read,
            WetBulbAsRead => &mut self.wet_bulb_as_read,
            MaxMinTempAsRead => &mut self.max_min_temp_as_read,
            DryBulbCorrected => &mut self.dry_bulb_corrected,
            WetBulbCorrected => &mut self.wet_bulb_corrected,
            MaxMinTempCorrected => &mut self.max_min_temp_corrected,
            DewPoint => &mut self.dew_point,
            RelativeHumidity => &mut self.relative_humidity,
            SquallForce => &mut self.squall_force,
            SquallDirection => &mut self.squall_direction,
            SquallTime => &mut self.squall_time,
            HorizontalVisibility => &mut self.horizontal_visibility,
            MiscMeteors => &mut self.misc_meteors,
            PastWeatherW1 => &mut self.past_weather_w1,
            PastWeatherW2 => &mut self.past_weather_w2,
            PresentWeatherWw => &mut self.present_weather_ww,
            C2Indicator => &mut self.c2_indicator,
            ObservationTime => &mut self.observation_time,
        }
    }

    pub fn squall_step(&self) -> SquallStep {
        SquallStep::from_flag(self.squall_confirmed)
    }

    pub fn clear_squall(&mut self) {
        self.squall_force.clear();
        self.squall_direction.clear();
        self.squall_time.clear();
    }

    /// Drop every measurement but keep the station identity.
    pub fn clear_measurements(&mut self) {
        let header = StationHeader {
            data_type: Default::default(),
            ..self.header.clone()
        };
        *self = Self {
            header,
            ..Self::default()
        };
    }

    /// Non-blank fields, for summaries and logging.
    pub fn filled_fields(&self) -> Vec<(FirstCardField, &str)> {
        FirstCardField::ALL
            .iter()
            .map(|&f| (f, self.get(f)))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect()
    }
}

/// The "calculated from" echo of the last successful hygrometric lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HygrometricSnapshot {
    pub dry_bulb: String,
    pub wet_bulb: String,
    pub difference: String,
    pub dew_point: String,
    // Already carried by the draft's relativeHumidity field
    #[serde(skip)]
    pub relative_humidity: String,
}

impl HygrometricSnapshot {
    pub fn is_empty(&self) -> bool {
        self.difference.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Body posted to the first-card endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FirstCardPayload {
    #[serde(flatten)]
    pub draft: FirstCardDraft,
    #[serde(flatten)]
    pub hygrometric: HygrometricSnapshot,
    pub timestamp: DateTime<Utc>,
}

impl FirstCardPayload {
    pub fn new(draft: FirstCardDraft, hygrometric: HygrometricSnapshot) -> Self {
        Self {
            draft,
            hygrometric,
            timestamp: Utc::now(),
        }
    }
}
