use tracing::{debug, info};
use validator::Validate;

use crate::error::{Result, SessionError};
use crate::models::{
    DerivedPressure, FirstCardDraft, FirstCardField, FirstCardPayload, FormTab, HeaderSegment,
    HumidityReading, HygrometricSnapshot, Notice, SquallStep, SubmissionOutcome,
};
use crate::processors::resolver::{parse_reading, DerivedValueResolver, ResolveError};
use crate::utils::constants::{MAX_SQUALL_DIRECTION, MIN_SQUALL_DIRECTION};

const HUMIDITY_OK: &str = "Dew point and relative humidity calculated successfully";
const PRESSURE_OK: &str = "Pressure values calculated successfully";
const SAVED_OK: &str = "Data saved successfully!";
const SAVE_FAILED: &str = "Submission failed";
const FORM_CLEARED: &str = "All form data has been cleared.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

/// State of one first-card entry: the draft, the derived values shown next to
/// it and the notices raised since they were last taken.
#[derive(Debug, Clone)]
pub struct FirstCardSession {
    resolver: DerivedValueResolver,
    draft: FirstCardDraft,
    snapshot: HygrometricSnapshot,
    active_tab: FormTab,
    submit_state: SubmitState,
    notices: Vec<Notice>,
}

impl FirstCardSession {
    pub fn new(resolver: DerivedValueResolver) -> Self {
        Self {
            resolver,
            draft: FirstCardDraft::new(),
            snapshot: HygrometricSnapshot::default(),
            active_tab: FormTab::Temperature,
            submit_state: SubmitState::Idle,
            notices: Vec::new(),
        }
    }

    /// Start from an existing draft and fill in its derived values.
    pub fn with_draft(resolver: DerivedValueResolver, draft: FirstCardDraft) -> Self {
        let mut session = Self::new(resolver);
        session.draft = draft;
        session.recalculate();
        session
    }

    pub fn draft(&self) -> &FirstCardDraft {
        &self.draft
    }

    pub fn snapshot(&self) -> &HygrometricSnapshot {
        &self.snapshot
    }

    pub fn active_tab(&self) -> FormTab {
        self.active_tab
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_state == SubmitState::Submitting
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn select_tab(&mut self, tab: FormTab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) -> FormTab {
        self.active_tab = self.active_tab.next();
        self.active_tab
    }

    pub fn previous_tab(&mut self) -> FormTab {
        self.active_tab = self.active_tab.previous();
        self.active_tab
    }

    /// Set a field by its wire name, e.g. `dryBulbAsRead`.
    pub fn set_field(&mut self, name: &str, value: &str) -> std::result::Result<(), SessionError> {
        let field = FirstCardField::from_name(name)
            .ok_or_else(|| SessionError::UnknownField(name.to_string()))?;
        self.set(field, value)
    }

    pub fn set(&mut self, field: FirstCardField, value: &str) -> std::result::Result<(), SessionError> {
        if field.is_derived() {
            return Err(SessionError::DerivedField(field.name().to_string()));
        }

        if field.is_squall() {
            if self.draft.squall_step() != SquallStep::Confirmed {
                return Err(SessionError::SquallNotConfirmed(field.name().to_string()));
            }
            if field == FirstCardField::SquallDirection {
                validate_squall_direction(value)?;
            }
        }

        self.draft.set(field, value);

        if field.triggers_humidity() {
            self.refresh_humidity();
        }
        if field.triggers_pressure() {
            self.refresh_pressure();
        }
        Ok(())
    }

    pub fn input_segment(
        &mut self,
        segment: HeaderSegment,
        index: usize,
        value: &str,
    ) -> std::result::Result<Option<usize>, SessionError> {
        self.draft.header.input_segment(segment, index, value)
    }

    pub fn squall_step(&self) -> SquallStep {
        self.draft.squall_step()
    }

    /// Pending or skipped squall measurements become editable.
    pub fn confirm_squall(&mut self) -> SquallStep {
        self.draft.squall_confirmed = SquallStep::Confirmed.as_flag();
        SquallStep::Confirmed
    }

    /// Decline squall measurements and move on to visibility.
    pub fn skip_squall(&mut self) -> SquallStep {
        if self.draft.squall_step() != SquallStep::Pending {
            return self.draft.squall_step();
        }
        self.draft.squall_confirmed = SquallStep::Skipped.as_flag();
        self.draft.clear_squall();
        self.active_tab = FormTab::Visibility;
        SquallStep::Skipped
    }

    /// Re-run both lookups against the current draft.
    pub fn recalculate(&mut self) {
        self.refresh_humidity();
        self.refresh_pressure();
    }

    pub fn reset(&mut self) {
        self.draft = FirstCardDraft::new();
        self.snapshot.clear();
        self.active_tab = FormTab::Temperature;
        self.notices.push(Notice::info(FORM_CLEARED));
    }

    /// Build the payload to post and mark the session as submitting.
    pub fn begin_submit(&mut self) -> Result<FirstCardPayload> {
        if self.is_submitting() {
            return Err(SessionError::SubmissionInFlight.into());
        }
        self.draft.header.validate()?;

        self.submit_state = SubmitState::Submitting;
        info!(
            station_no = %self.draft.header.station_no,
            fields = self.draft.filled_fields().len(),
            "Submitting first card"
        );
        Ok(FirstCardPayload::new(self.draft.clone(), self.snapshot.clone()))
    }

    pub fn finish_submit(
        &mut self,
        outcome: &SubmissionOutcome,
    ) -> std::result::Result<(), SessionError> {
        if !self.is_submitting() {
            return Err(SessionError::NoSubmissionInFlight);
        }
        self.submit_state = SubmitState::Idle;

        match outcome {
            SubmissionOutcome::Saved(receipt) => {
                self.draft.clear_measurements();
                self.snapshot.clear();
                self.notices
                    .push(Notice::success(SAVED_OK).with_detail(receipt.to_string()));
            }
            failed => {
                let message = failed.failure_message().unwrap_or(SAVE_FAILED);
                self.notices
                    .push(Notice::error(SAVE_FAILED).with_detail(message));
            }
        }
        Ok(())
    }

    fn refresh_humidity(&mut self) {
        let dry = self.draft.dry_bulb_as_read.trim();
        let wet = self.draft.wet_bulb_as_read.trim();
        if dry.is_empty() || wet.is_empty() {
            return;
        }

        let result = parse_reading("Dry-bulb", dry)
            .and_then(|dry| Ok((dry, parse_reading("Wet-bulb", wet)?)))
            .and_then(|(dry, wet)| {
                let reading = self.resolver.resolve_humidity(dry, wet)?;
                Ok((dry, wet, reading))
            });

        match result {
            Ok((dry, wet, reading)) => self.apply_humidity(dry, wet, &reading),
            Err(err) => self.report(err),
        }
    }

    fn refresh_pressure(&mut self) {
        let dry = self.draft.dry_bulb_as_read.trim();
        let bar = self.draft.bar_as_read.trim();
        if dry.is_empty() || bar.is_empty() {
            return;
        }

        let result = parse_reading("Dry-bulb", dry)
            .and_then(|dry| Ok((dry, parse_reading("Bar as read", bar)?)))
            .and_then(|(dry, bar)| self.resolver.resolve_pressure(dry, bar));

        match result {
            Ok(pressure) => self.apply_pressure(&pressure),
            Err(err) => self.report(err),
        }
    }

    /// The snapshot echoes the parsed readings, so `"025.0"` is stored as `"25"`.
    fn apply_humidity(
        &mut self,
        dry_bulb: Option<f64>,
        wet_bulb: Option<f64>,
        reading: &HumidityReading,
    ) {
        let dew_point = reading.dew_point.to_string();
        let relative_humidity = reading.relative_humidity.to_string();
        let echo = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();

        self.snapshot = HygrometricSnapshot {
            dry_bulb: echo(dry_bulb),
            wet_bulb: echo(wet_bulb),
            difference: reading.difference.to_string(),
            dew_point: dew_point.clone(),
            relative_humidity: relative_humidity.clone(),
        };
        self.draft.dew_point = dew_point;
        self.draft.relative_humidity = relative_humidity;
        self.notices.push(Notice::success(HUMIDITY_OK));
    }

    fn apply_pressure(&mut self, pressure: &DerivedPressure) {
        self.draft.height_difference = format!("{:.2}", pressure.height_difference_correction);
        self.draft.station_level_pressure = format!("{:.2}", pressure.station_level_pressure);
        self.draft.sea_level_reduction = format!("{:.2}", pressure.sea_level_reduction_constant);
        self.draft.corrected_sea_level_pressure = format!("{:.2}", pressure.sea_level_pressure);
        self.notices.push(Notice::success(PRESSURE_OK));
    }

    fn report(&mut self, err: ResolveError) {
        if err.is_silent() {
            debug!(error = %err, "Lookup skipped");
            return;
        }
        debug!(kind = err.kind(), error = %err, "Lookup failed");
        self.notices.push(Notice::error(err.to_string()));
    }
}

fn validate_squall_direction(value: &str) -> std::result::Result<(), SessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match trimmed.parse::<u16>() {
        Ok(degrees) if (MIN_SQUALL_DIRECTION..=MAX_SQUALL_DIRECTION).contains(&degrees) => Ok(()),
        _ => Err(SessionError::InvalidSquallDirection(trimmed.to_string())),
    }
}
