//! Turns raw chat submissions into backend calls and normalizes the outcome.

use tracing::{error, info, warn};

use crate::classifier::{classify, Classification, Query};
use crate::client::{BackendClient, BackendPayload};
use crate::session::SessionMemory;

pub const FORMAT_HINT: &str = "Please provide both region and crop in format: 'Region, Crop'";
pub const FORECAST_FAILED: &str = "Failed to get response from server. Please try again.";
pub const CONFIRM_FAILED: &str = "Failed to process your confirmation. Please try again.";

/// What a submission resolved to before any I/O
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Answer immediately without touching the network
    Local(BackendPayload),
    /// Perform this backend query
    Remote(Query),
}

/// Classifies input against the session memory and runs backend queries
pub struct InputHandler {
    memory: SessionMemory,
    client: BackendClient,
}

impl InputHandler {
    pub fn new(client: BackendClient) -> Self {
        Self::with_memory(client, SessionMemory::new())
    }

    pub fn with_memory(client: BackendClient, memory: SessionMemory) -> Self {
        Self { memory, client }
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Classify `text`, updating the session memory synchronously
    pub fn dispatch(&mut self, text: &str) -> Dispatch {
        match classify(text, &mut self.memory) {
            Classification::Remote(query) => Dispatch::Remote(query),
            Classification::MissingRegion => {
                info!("submission lacks region context");
                Dispatch::Local(BackendPayload::error(FORMAT_HINT))
            }
        }
    }

    /// Classify and, when needed, call the backend. Always yields exactly one payload.
    pub async fn handle(&mut self, text: &str) -> BackendPayload {
        match self.dispatch(text) {
            Dispatch::Local(payload) => payload,
            Dispatch::Remote(query) => execute(&self.client, &query).await,
        }
    }
}

/// Run a query, folding every failure into a fixed, user-facing reply.
pub async fn execute(client: &BackendClient, query: &Query) -> BackendPayload {
    match client.send(query).await {
        Ok(payload) => payload,
        Err(e) if e.is_transport() => {
            warn!(error = %e, region = query.region(), crop = query.crop(), "backend unreachable");
            BackendPayload::error(failure_message(query))
        }
        Err(e) => {
            error!(error = %e, region = query.region(), crop = query.crop(), "backend call failed");
            BackendPayload::error(failure_message(query))
        }
    }
}

fn failure_message(query: &Query) -> &'static str {
    match query {
        Query::Forecast { .. } => FORECAST_FAILED,
        Query::Confirm { .. } => CONFIRM_FAILED,
    }
}
