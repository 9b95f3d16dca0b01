use serde::Serialize;
use tracing::{info, warn};

use crate::config::SubmissionSettings;
use crate::error::Result;
use crate::models::{DailySummaryDraft, FirstCardPayload, SubmissionOutcome};
use crate::utils::constants::{
    DAILY_SAVE_FAILED_MESSAGE, DAILY_SUMMARY_ENDPOINT, FIRST_CARD_ENDPOINT, SAVE_FAILED_MESSAGE,
};

/// Posts finished cards to the observation server. One request per call, no
/// retries; a failed post is reported and the caller may resubmit.
pub struct SubmissionClient {
    client: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(settings: &SubmissionSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit_first_card(&self, payload: &FirstCardPayload) -> SubmissionOutcome {
        self.post(FIRST_CARD_ENDPOINT, payload, SAVE_FAILED_MESSAGE)
            .await
    }

    pub async fn submit_daily_summary(&self, draft: &DailySummaryDraft) -> SubmissionOutcome {
        self.post(DAILY_SUMMARY_ENDPOINT, draft, DAILY_SAVE_FAILED_MESSAGE)
            .await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
        fallback: &str,
    ) -> SubmissionOutcome {
        let url = format!("{}{}", self.base_url, endpoint);
        info!(%url, "Posting submission");

        let response = match self.client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "Submission request failed");
                return SubmissionOutcome::NetworkError {
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        let outcome = match response.text().await {
            Ok(text) => SubmissionOutcome::from_reply(status, &text, fallback),
            Err(e) => SubmissionOutcome::NetworkError {
                detail: e.to_string(),
            },
        };

        match &outcome {
            SubmissionOutcome::Saved(receipt) => info!(status, %receipt, "Submission accepted"),
            other => warn!(status, message = other.failure_message(), "Submission rejected"),
        }
        outcome
    }
}
