//! Calendar data shapes requested from the model, and the single-call event extractor.

use super::ask;
use crate::client::ChatModel;
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

pub const EVENT_SYSTEM_PROMPT: &str =
    "You are a calendar assistant, skilled in creating calendar events.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CalendarEvent {
    pub name: String,
    pub date: String,
    pub participants: Vec<String>,
}

/// Turn a free-text request into a [`CalendarEvent`].
///
/// `Ok(None)` when the model produced no conforming object.
pub async fn create_calendar_event<M>(model: &M, request: &str) -> Result<Option<CalendarEvent>>
where
    M: ChatModel + ?Sized,
{
    let event = ask::<CalendarEvent, M>(model, None, EVENT_SYSTEM_PROMPT, request).await?;
    if let Some(event) = &event {
        info!(name = %event.name, date = %event.date, "calendar event extracted");
    }
    Ok(event)
}

/// First chain stage: is this a calendar event at all?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventExtraction {
    /// Raw description of the event
    pub description: String,
    /// Whether this text describes a calendar event
    pub is_calendar_event: bool,
    /// Confidence score between 0 and 1
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventDetails {
    /// Name of the event
    pub name: String,
    /// Date and time of the event. Use ISO 8601 to format this value.
    pub date: String,
    /// Expected duration in minutes
    pub duration_minutes: i64,
    /// List of participants
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventConfirmation {
    /// Natural language confirmation message to the user
    pub confirmation_message: String,
    /// Generated link to the calendar event if applicable
    pub calendar_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    New,
    Modify,
    Other,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestType::New => "NEW",
            RequestType::Modify => "MODIFY",
            RequestType::Other => "OTHER",
        })
    }
}

/// Router output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalendarRequestType {
    /// Type of calendar request being made
    pub request_type: RequestType,
    /// Confidence score between 0 and 1
    pub confidence_score: f64,
    /// Cleaned description of the request
    pub description: String,
}

/// Details for creating a new event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewEventDetails {
    /// Name of the event
    pub name: String,
    /// Date and time of the event. Use ISO 8601 to format this value.
    pub date: String,
    /// Expected duration in minutes
    pub duration_minutes: i64,
    /// List of participants
    pub participants: Vec<String>,
}

/// Details for changing an existing event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModifiedDetails {
    /// Field to change
    pub field: String,
    /// New value for the field
    pub new_value: String,
}

/// Details for modifying an existing event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModifyEventDetails {
    /// Description to identify the existing event
    pub event_identifier: String,
    /// List of changes to make
    pub changes: Vec<ModifiedDetails>,
    /// New participants to add
    pub participants_to_add: Vec<String>,
    /// Participants to remove
    pub participants_to_remove: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub success: bool,
    pub message: String,
}

impl CalendarResponse {
    pub fn created(details: &NewEventDetails) -> Self {
        Self {
            success: true,
            message: format!(
                "Created new event '{}' for {} with {}",
                details.name,
                details.date,
                details.participants.join(", ")
            ),
        }
    }

    pub fn modified(details: &ModifyEventDetails) -> Self {
        Self {
            success: true,
            message: format!(
                "Modified event '{}' with the requested changes",
                details.event_identifier
            ),
        }
    }
}
