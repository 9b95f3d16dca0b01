use tracing::info;
use validator::Validate;

use crate::error::{Result, SessionError};
use crate::models::{DailySummaryDraft, Notice, SubmissionOutcome, SummaryTab};
use crate::processors::first_card_session::SubmitState;
use crate::utils::constants::DAILY_NETWORK_ERROR_MESSAGE;

const SAVED_OK: &str = "Weather data saved successfully";
const INCOMPLETE: &str = "Please fill the input fields before proceeding";

/// Tabbed entry of one daily summary card.
#[derive(Debug, Clone)]
pub struct DailySummarySession {
    draft: DailySummaryDraft,
    active_tab: SummaryTab,
    submit_state: SubmitState,
    notices: Vec<Notice>,
}

impl Default for DailySummarySession {
    fn default() -> Self {
        Self::new()
    }
}

impl DailySummarySession {
    pub fn new() -> Self {
        Self {
            draft: DailySummaryDraft::new(),
            active_tab: SummaryTab::BasicInfo,
            submit_state: SubmitState::Idle,
            notices: Vec::new(),
        }
    }

    pub fn with_draft(draft: DailySummaryDraft) -> Self {
        Self {
            draft,
            ..Self::new()
        }
    }

    pub fn draft(&self) -> &DailySummaryDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DailySummaryDraft {
        &mut self.draft
    }

    pub fn active_tab(&self) -> SummaryTab {
        self.active_tab
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_state == SubmitState::Submitting
    }

    pub fn select_tab(&mut self, tab: SummaryTab) {
        self.active_tab = tab;
    }

    /// Advance one tab. Returns `None` on the last tab, where only submit
    /// is offered.
    pub fn next_tab(&mut self) -> Option<SummaryTab> {
        let next = self.active_tab.next()?;
        self.active_tab = next;
        Some(next)
    }

    pub fn set_measurement(
        &mut self,
        index: usize,
        value: &str,
    ) -> std::result::Result<(), SessionError> {
        let len = self.draft.measurements.len();
        let slot = self
            .draft
            .measurements
            .get_mut(index)
            .ok_or(SessionError::SegmentOutOfRange {
                field: "measurements",
                index,
                len,
            })?;
        *slot = value.to_string();
        Ok(())
    }

    pub fn set_meteor_code(
        &mut self,
        index: usize,
        value: &str,
    ) -> std::result::Result<(), SessionError> {
        let len = self.draft.meteor_codes.len();
        let slot = self
            .draft
            .meteor_codes
            .get_mut(index)
            .ok_or(SessionError::SegmentOutOfRange {
                field: "meteorCodes",
                index,
                len,
            })?;
        *slot = value.to_string();
        Ok(())
    }

    /// Blank values remove the code.
    pub fn set_character_code(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            self.draft.character_codes.remove(key);
        } else {
            self.draft
                .character_codes
                .insert(key.to_string(), value.to_string());
        }
    }

    pub fn reset(&mut self) {
        self.draft = DailySummaryDraft::new();
        self.active_tab = SummaryTab::BasicInfo;
    }

    pub fn begin_submit(&mut self) -> Result<DailySummaryDraft> {
        if !self.active_tab.is_last() {
            return Err(SessionError::NotOnFinalTab.into());
        }
        if self.is_submitting() {
            return Err(SessionError::SubmissionInFlight.into());
        }
        if let Err(errors) = self.draft.validate() {
            self.notices.push(Notice::error(INCOMPLETE));
            return Err(errors.into());
        }

        self.submit_state = SubmitState::Submitting;
        info!(
            station_no = %self.draft.station_no,
            measurements = self.draft.filled_measurements(),
            "Submitting daily summary"
        );
        Ok(self.draft.clone())
    }

    pub fn finish_submit(
        &mut self,
        outcome: &SubmissionOutcome,
    ) -> std::result::Result<(), SessionError> {
        if !self.is_submitting() {
            return Err(SessionError::NoSubmissionInFlight);
        }
        self.submit_state = SubmitState::Idle;

        match outcome.failure_message_or(DAILY_NETWORK_ERROR_MESSAGE) {
            None => {
                self.reset();
                self.notices.push(Notice::success(SAVED_OK));
            }
            Some(message) => {
                self.notices.push(Notice::error(message));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StationError;
    use crate::models::SubmissionReceipt;
    use crate::utils::constants::DAILY_SAVE_FAILED_MESSAGE;

    fn on_last_tab() -> DailySummarySession {
        let mut session = DailySummarySession::new();
        while session.next_tab().is_some() {}
        session
    }

    #[test]
    fn test_tab_order() {
        let mut session = DailySummarySession::new();
        assert_eq!(session.next_tab(), Some(SummaryTab::Measurements));
        assert_eq!(session.next_tab(), Some(SummaryTab::MeteorCodes));
        assert_eq!(session.next_tab(), Some(SummaryTab::CharacterCodes));
        assert_eq!(session.next_tab(), Some(SummaryTab::WindDirection));
        assert_eq!(session.next_tab(), None);
        assert_eq!(session.active_tab(), SummaryTab::WindDirection);
    }

    #[test]
    fn test_submit_only_from_last_tab() {
        let mut session = DailySummarySession::new();
        let err = session.begin_submit().unwrap_err();
        assert!(matches!(err, StationError::Session(SessionError::NotOnFinalTab)));
    }

    #[test]
    fn test_validation_failure_adds_notice() {
        let mut session = on_last_tab();
        session.draft_mut().station_no = "419231".to_string();

        let err = session.begin_submit().unwrap_err();
        assert!(matches!(err, StationError::Validation(_)));
        assert_eq!(session.notices()[0].message, INCOMPLETE);
        assert!(!session.is_submitting());
    }

    #[test]
    fn test_slot_bounds() {
        let mut session = DailySummarySession::new();
        session.set_measurement(15, "12.4").unwrap();
        assert_eq!(
            session.set_measurement(16, "1"),
            Err(SessionError::SegmentOutOfRange {
                field: "measurements",
                index: 16,
                len: 16
            })
        );
        assert!(session.set_meteor_code(8, "x").is_err());

        session.set_character_code("cloud", "7");
        session.set_character_code("cloud", " ");
        assert!(session.draft().character_codes.is_empty());
    }

    #[test]
    fn test_success_resets_to_first_tab() {
        let mut session = on_last_tab();
        session.draft_mut().station_no = "41923".to_string();
        session.set_measurement(0, "31.2").unwrap();

        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.measurements[0], "31.2");
        assert!(session.begin_submit().is_err());

        session
            .finish_submit(&SubmissionOutcome::Saved(SubmissionReceipt {
                record_id: None,
                reference: Some("2024-06-01.json".to_string()),
            }))
            .unwrap();

        assert_eq!(session.active_tab(), SummaryTab::BasicInfo);
        assert_eq!(session.draft(), &DailySummaryDraft::new());
        assert_eq!(session.notices().last().unwrap().message, SAVED_OK);
    }

    #[test]
    fn test_failure_reports_server_message() {
        let mut session = on_last_tab();
        session.begin_submit().unwrap();
        session
            .finish_submit(&SubmissionOutcome::from_reply(
                500,
                "{}",
                DAILY_SAVE_FAILED_MESSAGE,
            ))
            .unwrap();

        let notice = session.notices().last().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.message, "Failed to save weather data");
        assert_eq!(session.active_tab(), SummaryTab::WindDirection);
    }

    #[test]
    fn test_network_failure_uses_form_message() {
        let mut session = on_last_tab();
        session.draft_mut().station_no = "41923".to_string();
        session.begin_submit().unwrap();
        session
            .finish_submit(&SubmissionOutcome::NetworkError {
                detail: "connection refused".to_string(),
            })
            .unwrap();

        let notice = session.notices().last().unwrap();
        assert!(notice.is_error());
        assert_eq!(
            notice.message,
            "An unexpected error occurred while submitting the form."
        );
        assert_eq!(session.draft().station_no, "41923");
        assert!(!session.is_submitting());
    }
}
