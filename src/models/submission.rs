use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::NETWORK_ERROR_MESSAGE;

/// What the server hands back once a card is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub record_id: Option<u64>,
    pub reference: Option<String>,
}

impl fmt::Display for SubmissionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.record_id, &self.reference) {
            (Some(id), _) => write!(f, "Entry #{} saved", id),
            (None, Some(reference)) => write!(f, "Saved as {}", reference),
            (None, None) => write!(f, "Saved"),
        }
    }
}

/// JSON reply of the submission endpoints. Every field is optional because
/// the two endpoints answer differently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerReply {
    pub success: Option<bool>,
    pub data_count: Option<u64>,
    pub id: Option<u64>,
    pub message: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Saved(SubmissionReceipt),
    Rejected { status: u16, message: String },
    NetworkError { detail: String },
}

impl SubmissionOutcome {
    /// Classify a reply. `fallback` is used when a failure carries no message.
    pub fn from_reply(status: u16, body: &str, fallback: &str) -> Self {
        let reply: ServerReply = serde_json::from_str(body).unwrap_or_default();
        let ok = (200..300).contains(&status) && reply.success != Some(false);

        if ok {
            SubmissionOutcome::Saved(SubmissionReceipt {
                record_id: reply.data_count.or(reply.id),
                reference: reply.filename,
            })
        } else {
            let message = reply
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());
            SubmissionOutcome::Rejected { status, message }
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SubmissionOutcome::Saved(_))
    }

    /// Message to show the observer on failure.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message_or(NETWORK_ERROR_MESSAGE)
    }

    /// Like [`failure_message`](Self::failure_message), with a form-specific
    /// text for transport failures.
    pub fn failure_message_or<'a>(&'a self, network_error: &'a str) -> Option<&'a str> {
        match self {
            SubmissionOutcome::Saved(_) => None,
            SubmissionOutcome::Rejected { message, .. } => Some(message),
            SubmissionOutcome::NetworkError { .. } => Some(network_error),
        }
    }
}
