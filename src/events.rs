use serde::{Deserialize, Serialize};

use crate::client::{BackendPayload, HealthStatus};
use crate::conversation::{FollowUp, RequestSeq};

/// Internal application events delivered to the UI loop from background tasks
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A backend call (or a local classification error) finished
    BackendResult { seq: RequestSeq, payload: BackendPayload },

    /// A delayed follow-up turn is due
    FollowUpDue(FollowUp),

    /// Result of the startup health probe; `None` when unreachable
    BackendHealth(Option<HealthStatus>),
}

/// Who authored a turn in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "BukidMate",
        }
    }

    pub fn avatar(&self) -> &'static str {
        match self {
            Sender::User => "👤",
            Sender::Bot => "🌱",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}
