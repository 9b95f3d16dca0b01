pub mod daily_summary;
pub mod first_card;
pub mod hygrometric;
pub mod notice;
pub mod observation;
pub mod station;
pub mod station_pressure;
pub mod submission;

pub use daily_summary::{DailySummaryDraft, SummaryTab};
pub use first_card::{
    FirstCardDraft, FirstCardField, FirstCardPayload, FormTab, HygrometricSnapshot, SquallStep,
};
pub use hygrometric::{HygrometricCell, HygrometricTable};
pub use notice::{Notice, NoticeLevel};
pub use observation::{
    DerivedPressure, DerivedRecord, DerivedValues, HumidityReading, ObservationInput, ObservationRow,
};
pub use station::{HeaderSegment, SegmentedField, StationHeader};
pub use station_pressure::{PressureLevel, StationPressureTable};
pub use submission::{ServerReply, SubmissionOutcome, SubmissionReceipt};
