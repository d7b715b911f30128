//! Observability event types.
//!
//! Two families leave the wizard: funnel events (how far a visitor got) and
//! conversion events (a lead was generated). Both are cheap to clone and
//! serialize to JSON for whatever analytics backend drains them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{FormType, StepId};

/// Source tag attached to every conversion event.
pub const LEAD_SOURCE_WEBSITE: &str = "website";

/// One observability event emitted by a wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadEvent {
    pub timestamp: DateTime<Utc>,

    /// Wizard session that produced the event
    pub session_id: Uuid,

    pub payload: EventPayload,
}

impl LeadEvent {
    pub fn new(session_id: Uuid, payload: EventPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id,
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Funnel,
    Conversion,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Funnel => "funnel",
            EventCategory::Conversion => "conversion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventPayload {
    /// Wizard mounted for a form type
    Started { form_type: FormType },

    /// A step passed validation on Next
    StepCompleted {
        form_type: FormType,
        /// 1-based position of the completed step
        step_number: usize,
        step_id: StepId,
    },

    /// The submission call succeeded
    Submitted {
        form_type: FormType,
        reference_number: String,
    },

    /// Conversion: a lead reached the backend
    LeadGenerated {
        /// Financing product code, or the form type when no product was chosen
        product: String,
        source: String,
    },
}

impl EventPayload {
    pub fn event_type_str(&self) -> &'static str {
        match self {
            EventPayload::Started { .. } => "started",
            EventPayload::StepCompleted { .. } => "stepCompleted",
            EventPayload::Submitted { .. } => "submitted",
            EventPayload::LeadGenerated { .. } => "leadGenerated",
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            EventPayload::LeadGenerated { .. } => EventCategory::Conversion,
            _ => EventCategory::Funnel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_with_type_tag() {
        let payload = EventPayload::StepCompleted {
            form_type: FormType::Application,
            step_number: 1,
            step_id: StepId::PersonalInfo,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "stepCompleted");
        assert_eq!(json["step_id"], "personal-info");
        assert_eq!(json["form_type"], "application");
    }

    #[test]
    fn test_categories() {
        let lead = EventPayload::LeadGenerated {
            product: "auto".to_string(),
            source: LEAD_SOURCE_WEBSITE.to_string(),
        };
        assert_eq!(lead.category(), EventCategory::Conversion);
        assert_eq!(
            EventPayload::Started {
                form_type: FormType::Contact
            }
            .category(),
            EventCategory::Funnel
        );
    }
}
