use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use validator::{Validate, ValidationError};

use crate::error::SessionError;
use crate::utils::constants::{DATA_TYPE_BOXES, STATION_NO_BOXES, YEAR_BOXES};

const EMPTY_BOX: char = ' ';

/// A code typed one character per box (station number, year, data type).
///
/// Serialized positionally: an empty box before a filled one is written as a
/// space, trailing empty boxes are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedField<const N: usize> {
    boxes: [Option<char>; N],
}

impl<const N: usize> Default for SegmentedField<N> {
    fn default() -> Self {
        Self { boxes: [None; N] }
    }
}

impl<const N: usize> SegmentedField<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill boxes left to right from `text`, a space leaving its box empty.
    /// `None` if it does not fit.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_end();
        if text.chars().count() > N {
            return None;
        }
        let mut field = Self::default();
        for (slot, c) in field.boxes.iter_mut().zip(text.chars()) {
            *slot = Some(c).filter(|c| *c != EMPTY_BOX);
        }
        Some(field)
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.boxes.iter().all(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.boxes.get(index).copied().flatten()
    }

    /// Write one box. Only the first character of `value` is kept.
    ///
    /// Returns the index of the box that should take focus next, if any.
    pub fn input(
        &mut self,
        field: &'static str,
        index: usize,
        value: &str,
    ) -> Result<Option<usize>, SessionError> {
        let slot = self
            .boxes
            .get_mut(index)
            .ok_or(SessionError::SegmentOutOfRange {
                field,
                index,
                len: N,
            })?;

        *slot = value.trim().chars().next();

        if slot.is_some() && index + 1 < N {
            Ok(Some(index + 1))
        } else {
            Ok(None)
        }
    }

    pub fn has_gaps(&self) -> bool {
        let filled = self.boxes.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        self.boxes[..filled].iter().any(Option::is_none)
    }

    pub fn value(&self) -> String {
        let text: String = self.boxes.iter().map(|c| c.unwrap_or(EMPTY_BOX)).collect();
        text.trim_end().to_string()
    }

    pub fn clear(&mut self) {
        self.boxes = [None; N];
    }
}

impl<const N: usize> fmt::Display for SegmentedField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl<const N: usize> Serialize for SegmentedField<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value())
    }
}

impl<'de, const N: usize> Deserialize<'de> for SegmentedField<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        SegmentedField::parse(&text).ok_or_else(|| {
            de::Error::custom(format!(
                "expected at most {} characters, got '{}'",
                N, text
            ))
        })
    }
}

pub type DataTypeCode = SegmentedField<DATA_TYPE_BOXES>;
pub type StationNumber = SegmentedField<STATION_NO_BOXES>;
pub type YearCode = SegmentedField<YEAR_BOXES>;

/// Which segmented header field an input targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSegment {
    DataType,
    StationNo,
    Year,
}

impl HeaderSegment {
    pub fn name(&self) -> &'static str {
        match self {
            HeaderSegment::DataType => "dataType",
            HeaderSegment::StationNo => "stationNo",
            HeaderSegment::Year => "year",
        }
    }
}

/// Card header identifying the station and observation year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct StationHeader {
    pub data_type: DataTypeCode,

    #[validate(custom(function = "validate_station_no"))]
    pub station_no: StationNumber,

    #[validate(length(max = 64))]
    pub station_name: String,

    #[validate(custom(function = "validate_year"))]
    pub year: YearCode,
}

fn validate_station_no(field: &StationNumber) -> Result<(), ValidationError> {
    if field.has_gaps() {
        return Err(ValidationError::new("station_no_gaps"));
    }
    if field.value().chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("station_no_digits"))
    }
}

fn validate_year(field: &YearCode) -> Result<(), ValidationError> {
    if field.has_gaps() {
        return Err(ValidationError::new("year_gaps"));
    }
    if field.value().chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("year_digits"))
    }
}

impl StationHeader {
    pub fn new(station_no: &str, station_name: &str, year: &str) -> Option<Self> {
        Some(Self {
            data_type: DataTypeCode::default(),
            station_no: StationNumber::parse(station_no)?,
            station_name: station_name.to_string(),
            year: YearCode::parse(year)?,
        })
    }

    pub fn input_segment(
        &mut self,
        segment: HeaderSegment,
        index: usize,
        value: &str,
    ) -> Result<Option<usize>, SessionError> {
        let name = segment.name();
        match segment {
            HeaderSegment::DataType => self.data_type.input(name, index, value),
            HeaderSegment::StationNo => self.station_no.input(name, index, value),
            HeaderSegment::Year => self.year.input(name, index, value),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let header = StationHeader::new("41923", "Dhaka", "24").unwrap();
        assert!(header.validate().is_ok());

        let bad = StationHeader::new("41a23", "Dhaka", "24").unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_segment_auto_advance() {
        let mut field = StationNumber::new();
        assert_eq!(field.input("stationNo", 0, "4").unwrap(), Some(1));
        assert_eq!(field.input("stationNo", 1, "19").unwrap(), Some(2));
        assert_eq!(field.get(1), Some('1'));
        // Clearing a box does not move focus
        assert_eq!(field.input("stationNo", 2, "").unwrap(), None);
        // Last box never advances
        assert_eq!(field.input("stationNo", 4, "3").unwrap(), None);
        assert_eq!(field.value(), "41  3");
        assert!(field.has_gaps());
        assert!(!field.is_complete());
    }

    #[test]
    fn test_segment_gaps_keep_position() {
        let mut field = StationNumber::new();
        field.input("stationNo", 0, "4").unwrap();
        field.input("stationNo", 1, "1").unwrap();
        field.input("stationNo", 4, "3").unwrap();

        let json = serde_json::to_value(field).unwrap();
        assert_eq!(json, "41  3");

        let parsed: StationNumber = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, field);
        assert_eq!(parsed.get(2), None);
        assert_eq!(parsed.get(4), Some('3'));

        let leading: StationNumber = serde_json::from_str(r#"" 1923""#).unwrap();
        assert_eq!(leading.get(0), None);
        assert_eq!(leading.get(1), Some('1'));
    }

    #[test]
    fn test_header_with_gaps_fails_validation() {
        let mut header = StationHeader::new("41923", "Dhaka", "24").unwrap();
        header.input_segment(HeaderSegment::StationNo, 2, "").unwrap();
        assert!(header.validate().is_err());

        // Unfilled trailing boxes are not gaps
        let partial = StationHeader::new("419", "Dhaka", "2").unwrap();
        assert!(!partial.station_no.has_gaps());
        assert!(partial.validate().is_ok());
    }

    #[test]
    fn test_segment_out_of_range() {
        let mut field = YearCode::new();
        let err = field.input("year", 2, "1").unwrap_err();
        assert_eq!(
            err,
            SessionError::SegmentOutOfRange {
                field: "year",
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn test_segment_serde() {
        let header = StationHeader::new("41923", "Dhaka", "24").unwrap();
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["stationNo"], "41923");
        assert_eq!(json["year"], "24");

        let parsed: StationHeader = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, header);

        let too_long = serde_json::json!({ "year": "2024" });
        assert!(serde_json::from_value::<StationHeader>(too_long).is_err());
    }
}
