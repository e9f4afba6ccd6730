//! Routing: classify a calendar request, then dispatch to the NEW or MODIFY handler.

use super::ask;
use super::calendar::{
    CalendarRequestType, CalendarResponse, ModifyEventDetails, NewEventDetails, RequestType,
};
use super::gate::{
    date_context, today_or_local, ConfidenceGate, DeclineReason, WorkflowOutcome,
    ROUTING_CONFIDENCE_THRESHOLD,
};
use crate::client::ChatModel;
use crate::Result;
use chrono::NaiveDate;
use tracing::{error, info, warn};

const ROUTER_SYSTEM_PROMPT: &str =
    "Determine if this is a request to create a new calendar event or modify an existing one.";

pub struct CalendarRouter<M> {
    model: M,
    gate: ConfidenceGate,
    today: Option<NaiveDate>,
    model_id: Option<String>,
}

impl<M: ChatModel> CalendarRouter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            gate: ConfidenceGate::new(ROUTING_CONFIDENCE_THRESHOLD),
            today: None,
            model_id: None,
        }
    }

    pub fn with_gate(mut self, gate: ConfidenceGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub async fn route(&self, input: &str) -> Result<Option<CalendarRequestType>> {
        info!("routing calendar request");
        let routed: Option<CalendarRequestType> =
            ask(&self.model, self.model_id.as_deref(), ROUTER_SYSTEM_PROMPT, input).await?;
        match &routed {
            Some(r) => info!(
                request_type = %r.request_type,
                confidence = r.confidence_score,
                "request routed"
            ),
            None => error!("routing returned no result"),
        }
        Ok(routed)
    }

    pub async fn handle_new(&self, description: &str) -> Result<WorkflowOutcome<CalendarResponse>> {
        info!("processing new event request");
        let system = format!(
            "{} Extract detailed event information for creating a new calendar event. \
             When dates reference 'next Tuesday' or similar relative dates, use this current date as reference.",
            date_context(today_or_local(self.today))
        );
        let details: Option<NewEventDetails> =
            ask(&self.model, self.model_id.as_deref(), &system, description).await?;

        Ok(match details {
            Some(details) => {
                info!(name = %details.name, date = %details.date, "new event");
                WorkflowOutcome::Completed(CalendarResponse::created(&details))
            }
            None => {
                error!("failed to parse new event details");
                DeclineReason::NoResult { stage: "new_event" }.into()
            }
        })
    }

    pub async fn handle_modify(
        &self,
        description: &str,
    ) -> Result<WorkflowOutcome<CalendarResponse>> {
        info!("processing event modification request");
        let system = format!(
            "{} Extract details for modifying an existing calendar event. \
             When dates reference 'next Tuesday' or similar relative dates, use this current date as reference.",
            date_context(today_or_local(self.today))
        );
        let details: Option<ModifyEventDetails> =
            ask(&self.model, self.model_id.as_deref(), &system, description).await?;

        Ok(match details {
            Some(details) => {
                info!(
                    event = %details.event_identifier,
                    changes = details.changes.len(),
                    "modified event"
                );
                WorkflowOutcome::Completed(CalendarResponse::modified(&details))
            }
            None => {
                error!("failed to parse modification details");
                DeclineReason::NoResult {
                    stage: "modify_event",
                }
                .into()
            }
        })
    }

    /// Route `input`, apply the confidence gate, then dispatch.
    ///
    /// A score below the threshold declines before any handler runs, whatever the
    /// request type.
    pub async fn process(&self, input: &str) -> Result<WorkflowOutcome<CalendarResponse>> {
        info!("processing calendar request");

        let Some(routed) = self.route(input).await? else {
            return Ok(DeclineReason::NoResult { stage: "route" }.into());
        };

        if let Err(reason) = self.gate.check(routed.confidence_score) {
            warn!(%reason, "low confidence score");
            return Ok(reason.into());
        }

        match routed.request_type {
            RequestType::New => self.handle_new(&routed.description).await,
            RequestType::Modify => self.handle_modify(&routed.description).await,
            RequestType::Other => {
                warn!("request type not supported");
                Ok(DeclineReason::UnsupportedRequest {
                    request_type: routed.request_type.to_string(),
                }
                .into())
            }
        }
    }
}
