use chrono::NaiveDate;
use std::fmt;

/// Threshold used by the prompt chain's gate.
pub const CHAIN_CONFIDENCE_THRESHOLD: f64 = 0.8;
/// Threshold used by the router before dispatching.
pub const ROUTING_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Why a workflow stopped without producing a result.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclineReason {
    /// A stage got no conforming structured answer (mismatch or refusal).
    NoResult { stage: &'static str },
    LowConfidence { score: f64, threshold: f64 },
    NotCalendarEvent,
    UnsupportedRequest { request_type: String },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::NoResult { stage } => write!(f, "no usable result from stage '{}'", stage),
            DeclineReason::LowConfidence { score, threshold } => {
                write!(f, "confidence {:.2} is below {:.2}", score, threshold)
            }
            DeclineReason::NotCalendarEvent => f.write_str("input does not describe a calendar event"),
            DeclineReason::UnsupportedRequest { request_type } => {
                write!(f, "request type {} is not supported", request_type)
            }
        }
    }
}

/// Result of a workflow run. Declining is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome<T> {
    Completed(T),
    Declined(DeclineReason),
}

impl<T> WorkflowOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed(_))
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            WorkflowOutcome::Completed(v) => Some(v),
            WorkflowOutcome::Declined(_) => None,
        }
    }

    pub fn into_completed(self) -> Option<T> {
        match self {
            WorkflowOutcome::Completed(v) => Some(v),
            WorkflowOutcome::Declined(_) => None,
        }
    }

    pub fn decline_reason(&self) -> Option<&DeclineReason> {
        match self {
            WorkflowOutcome::Completed(_) => None,
            WorkflowOutcome::Declined(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WorkflowOutcome<U> {
        match self {
            WorkflowOutcome::Completed(v) => WorkflowOutcome::Completed(f(v)),
            WorkflowOutcome::Declined(reason) => WorkflowOutcome::Declined(reason),
        }
    }
}

impl<T> From<DeclineReason> for WorkflowOutcome<T> {
    fn from(reason: DeclineReason) -> Self {
        WorkflowOutcome::Declined(reason)
    }
}

/// Passes when `score >= threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f64,
}

impl ConfidenceGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn passes(&self, score: f64) -> bool {
        score >= self.threshold
    }

    pub fn check(&self, score: f64) -> Result<(), DeclineReason> {
        if self.passes(score) {
            Ok(())
        } else {
            Err(DeclineReason::LowConfidence {
                score,
                threshold: self.threshold,
            })
        }
    }
}

/// `Today is Tuesday, April, 22, 2025`
pub fn date_context(today: NaiveDate) -> String {
    format!("Today is {}", today.format("%A, %B, %d, %Y"))
}

pub(crate) fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}
