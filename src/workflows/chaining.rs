//! Prompt chaining: extract → gate → parse details → confirm.

use super::ask;
use super::calendar::{EventConfirmation, EventDetails, EventExtraction};
use super::gate::{
    date_context, today_or_local, ConfidenceGate, DeclineReason, WorkflowOutcome,
    CHAIN_CONFIDENCE_THRESHOLD,
};
use crate::client::ChatModel;
use crate::Result;
use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

/// Three dependent calls with a gate after the first.
///
/// The gate passes only when the extraction says the text is a calendar event and
/// its confidence is at least the threshold (0.8 by default).
pub struct CalendarChain<M> {
    model: M,
    gate: ConfidenceGate,
    today: Option<NaiveDate>,
    model_id: Option<String>,
    signature: Option<String>,
}

impl<M: ChatModel> CalendarChain<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            gate: ConfidenceGate::new(CHAIN_CONFIDENCE_THRESHOLD),
            today: None,
            model_id: None,
            signature: None,
        }
    }

    pub fn with_gate(mut self, gate: ConfidenceGate) -> Self {
        self.gate = gate;
        self
    }

    /// Fix the reference date used to resolve relative dates (defaults to the local date).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Name the confirmation message is signed with.
    pub fn with_signature(mut self, name: impl Into<String>) -> Self {
        self.signature = Some(name.into());
        self
    }

    pub async fn extract(&self, input: &str) -> Result<Option<EventExtraction>> {
        info!("starting event extraction");
        debug!(input, "extraction input");

        let system = format!(
            "{} Analyze if the given text describes a calendar event",
            date_context(today_or_local(self.today))
        );
        let extraction: Option<EventExtraction> =
            ask(&self.model, self.model_id.as_deref(), &system, input).await?;

        match &extraction {
            Some(e) => info!(
                is_calendar_event = e.is_calendar_event,
                confidence = e.confidence_score,
                "extraction complete"
            ),
            None => error!("event extraction returned no result"),
        }
        Ok(extraction)
    }

    pub async fn parse_details(&self, description: &str) -> Result<Option<EventDetails>> {
        info!("parsing event details");
        let system = format!(
            "{} Extract detailed event information. \
             When dates reference 'next Tuesday' or similar relative dates, use this current date as reference.",
            date_context(today_or_local(self.today))
        );
        let details: Option<EventDetails> =
            ask(&self.model, self.model_id.as_deref(), &system, description).await?;
        if let Some(d) = &details {
            info!(name = %d.name, date = %d.date, participants = d.participants.len(), "event details parsed");
        }
        Ok(details)
    }

    pub async fn confirm(&self, details: &EventDetails) -> Result<Option<EventConfirmation>> {
        info!("generating confirmation message");
        let system = match &self.signature {
            Some(name) => format!(
                "Generate a confirmation message for the event. Sign off with the name, {}.",
                name
            ),
            None => "Generate a confirmation message for the event.".to_string(),
        };
        let user = serde_json::to_string(details)?;
        let confirmation: Option<EventConfirmation> =
            ask(&self.model, self.model_id.as_deref(), &system, &user).await?;
        if confirmation.is_some() {
            info!("confirmation generated");
        }
        Ok(confirmation)
    }

    /// Run the whole chain on `input`.
    pub async fn process(&self, input: &str) -> Result<WorkflowOutcome<EventConfirmation>> {
        info!("processing calendar request");

        let Some(extraction) = self.extract(input).await? else {
            return Ok(DeclineReason::NoResult { stage: "extract" }.into());
        };

        if !extraction.is_calendar_event {
            warn!(
                confidence = extraction.confidence_score,
                "gate check failed: not a calendar event"
            );
            return Ok(DeclineReason::NotCalendarEvent.into());
        }
        if let Err(reason) = self.gate.check(extraction.confidence_score) {
            warn!(%reason, "gate check failed");
            return Ok(reason.into());
        }
        info!("gate check passed");

        let Some(details) = self.parse_details(&extraction.description).await? else {
            error!("failed to parse event details");
            return Ok(DeclineReason::NoResult { stage: "parse_details" }.into());
        };

        let Some(confirmation) = self.confirm(&details).await? else {
            return Ok(DeclineReason::NoResult { stage: "confirm" }.into());
        };

        info!("calendar request processing complete");
        Ok(WorkflowOutcome::Completed(confirmation))
    }
}
