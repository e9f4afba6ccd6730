//! Multi-call workflows built from sequential completions.
//!
//! Every workflow awaits its calls one after another and stops early with
//! [`WorkflowOutcome::Declined`] when a stage yields nothing usable or a confidence
//! gate fails. Transport and remote failures are returned as errors.

pub mod calendar;
pub mod chaining;
pub mod gate;
pub mod routing;
pub mod tool_assist;

pub use calendar::{
    create_calendar_event, CalendarEvent, CalendarRequestType, CalendarResponse,
    EventConfirmation, EventDetails, EventExtraction, ModifiedDetails, ModifyEventDetails,
    NewEventDetails, RequestType,
};
pub use chaining::CalendarChain;
pub use gate::{
    date_context, ConfidenceGate, DeclineReason, WorkflowOutcome, CHAIN_CONFIDENCE_THRESHOLD,
    ROUTING_CONFIDENCE_THRESHOLD,
};
pub use routing::CalendarRouter;
pub use tool_assist::{InquiryResponse, ToolAssistant, WeatherResponse};

use crate::client::{ChatModel, CompletionExt, CompletionRequest};
use crate::types::Message;
use crate::Result;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// One structured stage: system prompt plus user text, answered in `T`'s schema.
pub(crate) async fn ask<T, M>(
    model: &M,
    model_id: Option<&str>,
    system: &str,
    user: &str,
) -> Result<Option<T>>
where
    T: DeserializeOwned + JsonSchema + Send,
    M: ChatModel + ?Sized,
{
    let mut request =
        CompletionRequest::new(vec![Message::system(system), Message::user(user)]).structured::<T>();
    request.model = model_id.map(str::to_string);
    model.parse::<T>(&request).await
}
