use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

use crate::utils::constants::{DAILY_MEASUREMENT_SLOTS, DAILY_METEOR_CODE_SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryTab {
    BasicInfo,
    Measurements,
    MeteorCodes,
    CharacterCodes,
    WindDirection,
}

impl SummaryTab {
    pub const ORDER: [SummaryTab; 5] = [
        SummaryTab::BasicInfo,
        SummaryTab::Measurements,
        SummaryTab::MeteorCodes,
        SummaryTab::CharacterCodes,
        SummaryTab::WindDirection,
    ];

    pub fn next(&self) -> Option<SummaryTab> {
        let index = SummaryTab::ORDER.iter().position(|t| t == self)?;
        SummaryTab::ORDER.get(index + 1).copied()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SummaryTab::BasicInfo => "Basic Info",
            SummaryTab::Measurements => "Measurements",
            SummaryTab::MeteorCodes => "Meteor Codes",
            SummaryTab::CharacterCodes => "Character Codes",
            SummaryTab::WindDirection => "Wind Direction",
        }
    }
}

impl fmt::Display for SummaryTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One day's summary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct DailySummaryDraft {
    #[validate(length(max = 2))]
    pub data_type: String,

    #[validate(length(max = 5))]
    pub station_no: String,

    #[validate(length(max = 2))]
    pub year: String,

    #[validate(length(max = 2))]
    pub month: String,

    #[validate(length(max = 2))]
    pub day: String,

    #[validate(length(equal = 16))]
    pub measurements: Vec<String>,

    #[validate(length(equal = 8))]
    pub meteor_codes: Vec<String>,

    pub character_codes: BTreeMap<String, String>,

    pub wind_direction: String,

    pub wind_time: String,
}

impl Default for DailySummaryDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl DailySummaryDraft {
    pub fn new() -> Self {
        Self {
            data_type: String::new(),
            station_no: String::new(),
            year: String::new(),
            month: String::new(),
            day: String::new(),
            measurements: vec![String::new(); DAILY_MEASUREMENT_SLOTS],
            meteor_codes: vec![String::new(); DAILY_METEOR_CODE_SLOTS],
            character_codes: BTreeMap::new(),
            wind_direction: String::new(),
            wind_time: String::new(),
        }
    }

    pub fn filled_measurements(&self) -> usize {
        self.measurements
            .iter()
            .filter(|m| !m.trim().is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_draft_is_valid() {
        let draft = DailySummaryDraft::new();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.measurements.len(), 16);
        assert_eq!(draft.meteor_codes.len(), 8);
    }

    #[test]
    fn test_length_limits() {
        let mut draft = DailySummaryDraft::new();
        draft.station_no = "419231".to_string();
        draft.month = "123".to_string();
        let errors = draft.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("station_no"));
        assert!(fields.contains_key("month"));
        assert!(!fields.contains_key("year"));
    }

    #[test]
    fn test_slot_counts_enforced() {
        let mut draft = DailySummaryDraft::new();
        draft.measurements.pop();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_tab_sequence() {
        assert_eq!(SummaryTab::BasicInfo.next(), Some(SummaryTab::Measurements));
        assert_eq!(SummaryTab::CharacterCodes.next(), Some(SummaryTab::WindDirection));
        assert!(SummaryTab::WindDirection.is_last());
        assert!(!SummaryTab::MeteorCodes.is_last());
    }

    #[test]
    fn test_deserialize_partial_draft() {
        let draft: DailySummaryDraft =
            serde_json::from_str(r#"{"stationNo":"41923","windDirection":"270"}"#).unwrap();
        assert_eq!(draft.station_no, "41923");
        assert_eq!(draft.measurements.len(), 16);
    }
}
