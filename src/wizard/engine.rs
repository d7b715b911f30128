//! Wizard Engine
//!
//! `WizardEngine` holds what every wizard session shares (submitter, event
//! sink, policy) and starts sessions. `LeadWizard` is one session: it applies
//! the state transitions, emits funnel events, and runs the submission
//! pipeline when Submit succeeds validation.

use std::sync::Arc;
use tracing::{debug, info};

use super::reference::{ReferenceNumber, ReferencePolicy};
use super::state::{ErrorMap, NextOutcome, SubmissionStatus, SubmissionTicket, SubmitStart, WizardState};
use super::view::WizardView;
use crate::config::{WizardConfig, ENV_SUBMIT_URL};
use crate::error::{ConfigError, WizardError};
use crate::events::{EventPayload, EventSink, LeadEvent};
use crate::form::{verify_catalog, FieldKey, FieldValue, FormRecord, FormType};
use crate::locale::{Locale, LocalizedMessage, MessageKey};
use crate::submission::{HttpSubmitter, LeadSubmitter, SubmissionPipeline};

/// Shared wizard setup. Cheap to clone.
#[derive(Clone)]
pub struct WizardEngine {
    pipeline: SubmissionPipeline,
    sink: Arc<dyn EventSink>,
    default_locale: Locale,
    reference_policy: ReferencePolicy,
}

impl WizardEngine {
    /// Create an engine. Fails if the step catalog is malformed.
    pub fn new(
        submitter: Arc<dyn LeadSubmitter>,
        sink: Arc<dyn EventSink>,
        config: &WizardConfig,
    ) -> Result<Self, ConfigError> {
        verify_catalog()?;
        Ok(Self {
            pipeline: SubmissionPipeline::new(submitter, sink.clone()),
            sink,
            default_locale: config.default_locale,
            reference_policy: config.reference_policy,
        })
    }

    /// Create an engine posting leads to `config.submit_url`.
    pub fn with_http(config: &WizardConfig, sink: Arc<dyn EventSink>) -> Result<Self, ConfigError> {
        let endpoint = config.submit_url.clone().ok_or_else(|| ConfigError::InvalidEnv {
            var: ENV_SUBMIT_URL,
            reason: "a submission URL is required for the HTTP submitter".to_string(),
        })?;
        let submitter = HttpSubmitter::new(endpoint, config.submit_timeout)?;
        Self::new(Arc::new(submitter), sink, config)
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    pub fn reference_policy(&self) -> ReferencePolicy {
        self.reference_policy
    }

    /// Start a wizard in the default locale with an empty record.
    pub fn start(&self, form_type: FormType) -> LeadWizard {
        self.start_with(form_type, self.default_locale, FormRecord::new())
    }

    /// Start a wizard with pre-filled values, e.g. amount and tenure carried
    /// over from the financing calculator.
    pub fn start_with(&self, form_type: FormType, locale: Locale, prefill: FormRecord) -> LeadWizard {
        let state = WizardState::new(form_type, locale, prefill);
        info!(session = %state.session_id, %form_type, %locale, "wizard started");
        self.sink.emit(LeadEvent::new(
            state.session_id,
            EventPayload::Started { form_type },
        ));
        LeadWizard {
            state,
            engine: self.clone(),
        }
    }
}

/// Final result of [`LeadWizard::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(ReferenceNumber),
    /// Submission call failed; the notice is the generic localized message
    Failed(LocalizedMessage),
    /// Last step has field errors
    Invalid(ErrorMap),
    NotOnLastStep,
    /// Already submitting or succeeded
    Ignored,
}

/// One wizard session.
pub struct LeadWizard {
    state: WizardState,
    engine: WizardEngine,
}

impl std::fmt::Debug for LeadWizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadWizard").field("state", &self.state).finish_non_exhaustive()
    }
}

impl LeadWizard {
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn view(&self) -> WizardView {
        WizardView::from_state(&self.state)
    }

    pub fn edit_field(&mut self, key: FieldKey, value: impl Into<FieldValue>) -> bool {
        self.state.edit_field(key, value)
    }

    pub fn clear_field(&mut self, key: FieldKey) -> bool {
        self.state.clear_field(key)
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.state.set_locale(locale);
    }

    pub fn validate_step(&self, index: usize) -> Result<ErrorMap, WizardError> {
        self.state.validate_step(index)
    }

    /// Validate the current step and advance when clean.
    pub fn next(&mut self) -> NextOutcome {
        let outcome = self.state.next();
        match &outcome {
            NextOutcome::Completed {
                step_id,
                step_number,
            } => {
                debug!(session = %self.state.session_id, %step_id, step_number, "step completed");
                self.engine.sink.emit(LeadEvent::new(
                    self.state.session_id,
                    EventPayload::StepCompleted {
                        form_type: self.state.form_type,
                        step_number: *step_number,
                        step_id: *step_id,
                    },
                ));
            }
            NextOutcome::Blocked { error_count } => {
                debug!(session = %self.state.session_id, error_count, "step has errors");
            }
            NextOutcome::Ignored => {}
        }
        outcome
    }

    pub fn previous(&mut self) -> bool {
        self.state.previous()
    }

    /// Validate the last step and submit the lead.
    ///
    /// Makes exactly one call to the submitter; a failure leaves the wizard in
    /// `Failed` with all data intact, from where Submit may be called again.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let ticket = match self.begin_submit() {
            SubmitStart::Ready(ticket) => ticket,
            SubmitStart::Invalid { .. } => return SubmitOutcome::Invalid(self.state.errors().clone()),
            SubmitStart::NotOnLastStep => return SubmitOutcome::NotOnLastStep,
            SubmitStart::Ignored => return SubmitOutcome::Ignored,
        };

        let result = self.engine.pipeline.run(self.state.session_id, &ticket).await;
        self.complete_submit(result.is_ok());

        match result {
            Ok(()) => SubmitOutcome::Succeeded(ticket.reference),
            Err(_) => SubmitOutcome::Failed(
                self.state
                    .submission_notice()
                    .cloned()
                    .unwrap_or_else(|| MessageKey::SubmissionFailed.localize(self.state.locale)),
            ),
        }
    }

    /// Synchronous half of Submit, for hosts that run the pipeline themselves
    /// (see [`LeadWizard::pipeline`]) without holding the wizard across the await.
    pub fn begin_submit(&mut self) -> SubmitStart {
        let start = self
            .state
            .begin_submit(self.engine.reference_policy, ReferenceNumber::generate);
        if let SubmitStart::Ready(SubmissionTicket { reference, attempt, .. }) = &start {
            debug!(session = %self.state.session_id, %reference, attempt, "submitting");
        }
        start
    }

    /// Settle the in-flight submission started by [`LeadWizard::begin_submit`].
    pub fn complete_submit(&mut self, succeeded: bool) -> SubmissionStatus {
        self.state.complete_submit(succeeded)
    }

    pub fn pipeline(&self) -> &SubmissionPipeline {
        &self.engine.pipeline
    }

    pub fn dismiss_failure(&mut self) -> bool {
        self.state.dismiss_failure()
    }

    /// Close a successful wizard, returning its reference. A wizard that has not
    /// succeeded is handed back unchanged.
    pub fn acknowledge(self) -> Result<ReferenceNumber, LeadWizard> {
        match self.state.reference().cloned() {
            Some(reference) => {
                debug!(session = %self.state.session_id, %reference, "success acknowledged");
                Ok(reference)
            }
            None => Err(self),
        }
    }
}
