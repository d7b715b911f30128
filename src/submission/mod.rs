//! Submission Pipeline
//!
//! The wizard hands a validated record to a [`LeadSubmitter`] exactly once
//! per Submit. Implementations decide where the lead goes: an HTTP endpoint
//! ([`HttpSubmitter`]) or a host-supplied handler ([`FnSubmitter`]).

pub mod http;
pub mod pipeline;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SubmissionError;
use crate::form::{FormRecord, FormType};
use crate::wizard::ReferenceNumber;

pub use http::HttpSubmitter;
pub use pipeline::SubmissionPipeline;

/// Body sent to the submission boundary: every entered field at the top
/// level, plus the reference number and form type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub fields: FormRecord,
    pub reference_number: ReferenceNumber,
    pub form_type: FormType,
}

/// External collaborator that accepts or rejects a lead.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError>;
}

/// Adapts a synchronous closure into a [`LeadSubmitter`].
pub struct FnSubmitter<F> {
    handler: F,
}

impl<F> FnSubmitter<F>
where
    F: Fn(&SubmissionPayload) -> Result<(), SubmissionError> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> LeadSubmitter for FnSubmitter<F>
where
    F: Fn(&SubmissionPayload) -> Result<(), SubmissionError> + Send + Sync,
{
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        (self.handler)(payload)
    }
}
