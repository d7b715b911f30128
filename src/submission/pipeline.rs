//! One submission attempt: call the submitter, then report the outcome.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{LeadSubmitter, SubmissionPayload};
use crate::error::SubmissionError;
use crate::events::{EventPayload, EventSink, LeadEvent, LEAD_SOURCE_WEBSITE};
use crate::form::FieldKey;
use crate::wizard::SubmissionTicket;

#[derive(Clone)]
pub struct SubmissionPipeline {
    submitter: Arc<dyn LeadSubmitter>,
    sink: Arc<dyn EventSink>,
}

impl SubmissionPipeline {
    pub fn new(submitter: Arc<dyn LeadSubmitter>, sink: Arc<dyn EventSink>) -> Self {
        Self { submitter, sink }
    }

    /// Make exactly one submission attempt for `ticket`.
    ///
    /// On success the `Submitted` and `LeadGenerated` events are emitted. On
    /// failure the cause is logged and returned; callers show only a generic
    /// notice.
    pub async fn run(&self, session_id: Uuid, ticket: &SubmissionTicket) -> Result<(), SubmissionError> {
        let payload = SubmissionPayload {
            fields: ticket.record.clone(),
            reference_number: ticket.reference.clone(),
            form_type: ticket.form_type,
        };

        match self.submitter.submit(&payload).await {
            Ok(()) => {
                info!(
                    session = %session_id,
                    form_type = %ticket.form_type,
                    reference = %ticket.reference,
                    attempt = ticket.attempt,
                    "lead submitted"
                );
                self.emit_success(session_id, ticket);
                Ok(())
            }
            Err(e) => {
                warn!(
                    session = %session_id,
                    form_type = %ticket.form_type,
                    reference = %ticket.reference,
                    attempt = ticket.attempt,
                    error = %e,
                    "lead submission failed"
                );
                Err(e)
            }
        }
    }

    fn emit_success(&self, session_id: Uuid, ticket: &SubmissionTicket) {
        self.sink.emit(LeadEvent::new(
            session_id,
            EventPayload::Submitted {
                form_type: ticket.form_type,
                reference_number: ticket.reference.to_string(),
            },
        ));

        let product = ticket
            .record
            .text(FieldKey::FinancingType)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| ticket.form_type.to_string());
        self.sink.emit(LeadEvent::new(
            session_id,
            EventPayload::LeadGenerated {
                product,
                source: LEAD_SOURCE_WEBSITE.to_string(),
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::form::{FormRecord, FormType};
    use crate::submission::FnSubmitter;
    use crate::wizard::ReferenceNumber;

    fn ticket(record: FormRecord) -> SubmissionTicket {
        SubmissionTicket {
            form_type: FormType::Application,
            reference: ReferenceNumber::generate(FormType::Application),
            record,
            attempt: 1,
        }
    }

    #[tokio::test]
    async fn test_success_emits_submitted_and_lead() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = SubmissionPipeline::new(Arc::new(FnSubmitter::new(|_| Ok(()))), sink.clone());

        let mut record = FormRecord::new();
        record.set(FieldKey::FinancingType, "auto");
        let ticket = ticket(record);

        pipeline.run(Uuid::new_v4(), &ticket).await.unwrap();

        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 2);
        assert_eq!(
            payloads[0],
            EventPayload::Submitted {
                form_type: FormType::Application,
                reference_number: ticket.reference.to_string(),
            }
        );
        assert_eq!(
            payloads[1],
            EventPayload::LeadGenerated {
                product: "auto".to_string(),
                source: "website".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_lead_falls_back_to_form_type() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = SubmissionPipeline::new(Arc::new(FnSubmitter::new(|_| Ok(()))), sink.clone());

        pipeline.run(Uuid::new_v4(), &ticket(FormRecord::new())).await.unwrap();

        assert!(sink.payloads().contains(&EventPayload::LeadGenerated {
            product: "application".to_string(),
            source: "website".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_failure_emits_nothing() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = SubmissionPipeline::new(
            Arc::new(FnSubmitter::new(|_| Err(SubmissionError::Rejected { status: 503 }))),
            sink.clone(),
        );

        let result = pipeline.run(Uuid::new_v4(), &ticket(FormRecord::new())).await;

        assert!(matches!(result, Err(SubmissionError::Rejected { status: 503 })));
        assert!(sink.events().is_empty());
    }
}
