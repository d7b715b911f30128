//! Wizard State
//!
//! `WizardState` is a plain serializable value. Every transition is a method
//! that takes the current state and the user's intent and updates it in
//! place; nothing here performs I/O, emits events or awaits. The engine wraps
//! these transitions with event emission and the submission call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use super::reference::{ReferenceNumber, ReferencePolicy};
use crate::error::WizardError;
use crate::form::{steps_for, validate_field, FieldKey, FieldValue, FormRecord, FormType, StepDefinition, StepId};
use crate::locale::{Locale, LocalizedMessage, MessageKey};

/// Per-field validation messages for the step validated last.
pub type ErrorMap = BTreeMap<FieldKey, LocalizedMessage>;

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum WizardPhase {
    /// Collecting input on the current step
    Editing,
    /// Submission call in flight; input is frozen
    Submitting { reference: ReferenceNumber },
    /// Lead accepted
    Succeeded { reference: ReferenceNumber },
    /// Submission call failed; the visitor may retry
    Failed {
        notice: LocalizedMessage,
        reference: ReferenceNumber,
    },
}

/// Coarse submission status for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Result of a Next transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// Step passed validation. `step_number` is 1-based.
    Completed { step_id: StepId, step_number: usize },
    /// Step has errors; the wizard stayed put
    Blocked { error_count: usize },
    /// Not accepting input (submitting or already succeeded)
    Ignored,
}

/// Result of the synchronous half of Submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Entered `Submitting`; hand the ticket to the submission pipeline
    Ready(SubmissionTicket),
    /// Last step has errors; they are now in the error map
    Invalid { error_count: usize },
    /// Submit is only available on the last step
    NotOnLastStep,
    /// A submission is in flight or already succeeded
    Ignored,
}

/// Everything the submission pipeline needs for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    pub form_type: FormType,
    pub reference: ReferenceNumber,
    pub record: FormRecord,
    /// 1-based attempt counter for this wizard session
    pub attempt: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredWizardState")]
pub struct WizardState {
    pub session_id: Uuid,
    pub form_type: FormType,
    pub locale: Locale,
    step_index: usize,
    record: FormRecord,
    errors: ErrorMap,
    phase: WizardPhase,
    attempts: u32,
    /// Reference of the latest failed attempt; outlives a dismissed notice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_failed_reference: Option<ReferenceNumber>,
}

/// Serialized shape of [`WizardState`], checked before it becomes a live state.
#[derive(Deserialize)]
struct StoredWizardState {
    session_id: Uuid,
    form_type: FormType,
    locale: Locale,
    step_index: usize,
    record: FormRecord,
    errors: ErrorMap,
    phase: WizardPhase,
    attempts: u32,
    #[serde(default)]
    last_failed_reference: Option<ReferenceNumber>,
}

impl TryFrom<StoredWizardState> for WizardState {
    type Error = WizardError;

    fn try_from(stored: StoredWizardState) -> Result<Self, Self::Error> {
        let count = steps_for(stored.form_type).len();
        if stored.step_index >= count {
            return Err(WizardError::StepOutOfRange {
                index: stored.step_index,
                count,
            });
        }
        Ok(Self {
            session_id: stored.session_id,
            form_type: stored.form_type,
            locale: stored.locale,
            step_index: stored.step_index,
            record: stored.record,
            errors: stored.errors,
            phase: stored.phase,
            attempts: stored.attempts,
            last_failed_reference: stored.last_failed_reference,
        })
    }
}

impl WizardState {
    /// Start at the first step with `prefill` as the initial record.
    pub fn new(form_type: FormType, locale: Locale, prefill: FormRecord) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            form_type,
            locale,
            step_index: 0,
            record: prefill,
            errors: ErrorMap::new(),
            phase: WizardPhase::Editing,
            attempts: 0,
            last_failed_reference: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn steps(&self) -> &'static [StepDefinition] {
        steps_for(self.form_type)
    }

    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> &'static StepDefinition {
        &self.steps()[self.step_index]
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 == self.step_count()
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn status(&self) -> SubmissionStatus {
        match self.phase {
            WizardPhase::Editing => SubmissionStatus::Idle,
            WizardPhase::Submitting { .. } => SubmissionStatus::Submitting,
            WizardPhase::Succeeded { .. } => SubmissionStatus::Succeeded,
            WizardPhase::Failed { .. } => SubmissionStatus::Failed,
        }
    }

    /// The reference of a successful submission.
    pub fn reference(&self) -> Option<&ReferenceNumber> {
        match &self.phase {
            WizardPhase::Succeeded { reference } => Some(reference),
            _ => None,
        }
    }

    /// The retryable notice shown after a failed submission.
    pub fn submission_notice(&self) -> Option<&LocalizedMessage> {
        match &self.phase {
            WizardPhase::Failed { notice, .. } => Some(notice),
            _ => None,
        }
    }

    /// Input is accepted while editing and after a failed submission.
    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, WizardPhase::Editing | WizardPhase::Failed { .. })
    }

    /// Percentage of steps completed; 100 once the lead is accepted.
    pub fn progress(&self) -> u8 {
        if matches!(self.phase, WizardPhase::Succeeded { .. }) {
            return 100;
        }
        ((self.step_index * 100) / self.step_count()) as u8
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Set a field value and drop any error shown for it.
    ///
    /// Returns `false` when the wizard is not accepting input.
    pub fn edit_field(&mut self, key: FieldKey, value: impl Into<FieldValue>) -> bool {
        if !self.accepts_input() {
            debug!(session = %self.session_id, field = %key, "edit ignored while {:?}", self.status());
            return false;
        }
        self.record.set(key, value);
        self.errors.remove(&key);
        true
    }

    /// Remove a field value, with the same error semantics as an edit.
    pub fn clear_field(&mut self, key: FieldKey) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.record.remove(key);
        self.errors.remove(&key);
        true
    }

    /// Validate the fields owned by step `index` against the current record.
    ///
    /// Does not touch the stored error map.
    pub fn validate_step(&self, index: usize) -> Result<ErrorMap, WizardError> {
        let steps = self.steps();
        let step = steps.get(index).ok_or(WizardError::StepOutOfRange {
            index,
            count: steps.len(),
        })?;

        Ok(step
            .fields
            .iter()
            .filter_map(|&key| {
                validate_field(key, self.record.get(key), self.locale)
                    .into_error()
                    .map(|message| (key, message))
            })
            .collect())
    }

    fn validate_current(&self) -> ErrorMap {
        // step_index is kept in range by every transition
        self.validate_step(self.step_index).unwrap_or_default()
    }

    /// Validate the current step and move forward if it is clean.
    pub fn next(&mut self) -> NextOutcome {
        if !self.accepts_input() {
            return NextOutcome::Ignored;
        }

        let errors = self.validate_current();
        if !errors.is_empty() {
            let error_count = errors.len();
            self.errors = errors;
            return NextOutcome::Blocked { error_count };
        }

        let completed = self.current_step();
        let step_number = self.step_index + 1;
        self.step_index = (self.step_index + 1).min(self.step_count() - 1);
        self.errors.clear();

        NextOutcome::Completed {
            step_id: completed.id,
            step_number,
        }
    }

    /// Move back one step without validating. The re-entered step starts with
    /// no errors shown, and a failure notice is dismissed since Submit is only
    /// offered on the last step.
    pub fn previous(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.dismiss_failure();
        let moved = self.step_index > 0;
        self.step_index = self.step_index.saturating_sub(1);
        self.errors.clear();
        moved
    }

    /// Synchronous half of Submit: validate the last step and, when clean,
    /// enter `Submitting` with a reference for this attempt.
    pub fn begin_submit(
        &mut self,
        policy: ReferencePolicy,
        mint: impl FnOnce(FormType) -> ReferenceNumber,
    ) -> SubmitStart {
        if !self.accepts_input() {
            return SubmitStart::Ignored;
        }
        if !self.is_last_step() {
            return SubmitStart::NotOnLastStep;
        }

        let errors = self.validate_current();
        if !errors.is_empty() {
            let error_count = errors.len();
            self.errors = errors;
            return SubmitStart::Invalid { error_count };
        }
        self.errors.clear();

        let reference = match (&self.last_failed_reference, policy) {
            (Some(reference), ReferencePolicy::ReuseOnRetry) => reference.clone(),
            _ => mint(self.form_type),
        };

        self.attempts += 1;
        self.phase = WizardPhase::Submitting {
            reference: reference.clone(),
        };

        SubmitStart::Ready(SubmissionTicket {
            form_type: self.form_type,
            reference,
            record: self.record.clone(),
            attempt: self.attempts,
        })
    }

    /// Settle an in-flight submission. Ignored unless `Submitting`.
    pub fn complete_submit(&mut self, succeeded: bool) -> SubmissionStatus {
        let WizardPhase::Submitting { reference } = &self.phase else {
            return self.status();
        };
        let reference = reference.clone();

        self.phase = if succeeded {
            self.last_failed_reference = None;
            WizardPhase::Succeeded { reference }
        } else {
            self.last_failed_reference = Some(reference.clone());
            WizardPhase::Failed {
                notice: MessageKey::SubmissionFailed.localize(self.locale),
                reference,
            }
        };
        self.status()
    }

    /// Hide the failure notice and go back to editing. Entered data is kept.
    pub fn dismiss_failure(&mut self) -> bool {
        if matches!(self.phase, WizardPhase::Failed { .. }) {
            self.phase = WizardPhase::Editing;
            true
        } else {
            false
        }
    }

    /// Switch display language. Stored errors are re-resolved.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        for message in self.errors.values_mut() {
            *message = message.key.localize(locale);
        }
        if let WizardPhase::Failed { notice, .. } = &mut self.phase {
            *notice = notice.key.localize(locale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(form_type: FormType) -> ReferenceNumber {
        ReferenceNumber::generate(form_type)
    }

    fn valid_contact() -> WizardState {
        let mut state = WizardState::new(FormType::Contact, Locale::En, FormRecord::new());
        state.edit_field(FieldKey::FullName, "Ahmed Ali");
        state.edit_field(FieldKey::Phone, "0512345678");
        state.edit_field(FieldKey::Email, "a@b.com");
        state.edit_field(FieldKey::Subject, "Hi");
        state.edit_field(FieldKey::Message, "I need help with financing");
        state.edit_field(FieldKey::ConsentPdpl, true);
        state
    }

    #[test]
    fn test_new_state() {
        let state = WizardState::new(FormType::Application, Locale::Ar, FormRecord::new());
        assert_eq!(state.step_index(), 0);
        assert_eq!(state.status(), SubmissionStatus::Idle);
        assert!(state.errors().is_empty());
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_validate_step_out_of_range() {
        let state = WizardState::new(FormType::Contact, Locale::En, FormRecord::new());
        assert_eq!(
            state.validate_step(3),
            Err(WizardError::StepOutOfRange { index: 3, count: 1 })
        );
    }

    #[test]
    fn test_validate_step_does_not_mutate() {
        let state = WizardState::new(FormType::Contact, Locale::En, FormRecord::new());
        let errors = state.validate_step(0).unwrap();
        assert!(!errors.is_empty());
        assert!(state.errors().is_empty());
    }

    #[test]
    fn test_next_blocked_keeps_index() {
        let mut state = WizardState::new(FormType::Application, Locale::En, FormRecord::new());
        let outcome = state.next();
        assert!(matches!(outcome, NextOutcome::Blocked { .. }));
        assert_eq!(state.step_index(), 0);
        assert!(state.errors().contains_key(&FieldKey::FullName));
    }

    #[test]
    fn test_next_on_last_step_clamps() {
        let mut state = valid_contact();
        let outcome = state.next();
        assert_eq!(
            outcome,
            NextOutcome::Completed {
                step_id: StepId::ContactDetails,
                step_number: 1
            }
        );
        assert_eq!(state.step_index(), 0);
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        let mut state = WizardState::new(FormType::Application, Locale::En, FormRecord::new());
        assert!(!state.previous());
        assert_eq!(state.step_index(), 0);
    }

    #[test]
    fn test_submit_transitions_to_submitting() {
        let mut state = valid_contact();
        let start = state.begin_submit(ReferencePolicy::FreshPerAttempt, mint);
        let SubmitStart::Ready(ticket) = start else {
            panic!("expected ready, got {:?}", start);
        };
        assert_eq!(ticket.attempt, 1);
        assert_eq!(ticket.reference.prefix(), "INQ");
        assert_eq!(state.status(), SubmissionStatus::Submitting);

        // A second Submit while in flight is ignored
        assert_eq!(
            state.begin_submit(ReferencePolicy::FreshPerAttempt, mint),
            SubmitStart::Ignored
        );
        // Edits are frozen too
        assert!(!state.edit_field(FieldKey::Subject, "changed"));
    }

    #[test]
    fn test_complete_submit_success() {
        let mut state = valid_contact();
        let SubmitStart::Ready(ticket) = state.begin_submit(ReferencePolicy::FreshPerAttempt, mint)
        else {
            panic!("expected ready");
        };
        assert_eq!(state.complete_submit(true), SubmissionStatus::Succeeded);
        assert_eq!(state.reference(), Some(&ticket.reference));
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn test_failure_is_retryable_and_keeps_data() {
        let mut state = valid_contact();
        state.begin_submit(ReferencePolicy::FreshPerAttempt, mint);
        assert_eq!(state.complete_submit(false), SubmissionStatus::Failed);
        assert_eq!(
            state.submission_notice().map(|n| n.key),
            Some(MessageKey::SubmissionFailed)
        );
        assert_eq!(state.record().text(FieldKey::FullName), Some("Ahmed Ali"));

        assert!(matches!(
            state.begin_submit(ReferencePolicy::FreshPerAttempt, mint),
            SubmitStart::Ready(SubmissionTicket { attempt: 2, .. })
        ));
    }

    #[test]
    fn test_reuse_policy_keeps_reference() {
        let mut state = valid_contact();
        let SubmitStart::Ready(first) = state.begin_submit(ReferencePolicy::ReuseOnRetry, mint) else {
            panic!("expected ready");
        };
        state.complete_submit(false);

        let SubmitStart::Ready(second) = state.begin_submit(ReferencePolicy::ReuseOnRetry, |_| {
            panic!("reference must not be re-minted")
        }) else {
            panic!("expected ready");
        };
        assert_eq!(first.reference, second.reference);
    }

    #[test]
    fn test_reuse_policy_survives_dismissed_notice() {
        let mut state = valid_contact();
        let SubmitStart::Ready(first) = state.begin_submit(ReferencePolicy::ReuseOnRetry, mint) else {
            panic!("expected ready");
        };
        state.complete_submit(false);
        assert!(state.dismiss_failure());

        let SubmitStart::Ready(second) = state.begin_submit(ReferencePolicy::ReuseOnRetry, |_| {
            panic!("reference must not be re-minted")
        }) else {
            panic!("expected ready");
        };
        assert_eq!(first.reference, second.reference);
    }

    #[test]
    fn test_success_forgets_failed_reference() {
        let mut state = valid_contact();
        state.begin_submit(ReferencePolicy::ReuseOnRetry, mint);
        state.complete_submit(false);
        state.begin_submit(ReferencePolicy::ReuseOnRetry, mint);
        state.complete_submit(true);

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("last_failed_reference").is_none());
    }

    #[test]
    fn test_previous_dismisses_failure_notice() {
        let mut state = WizardState::new(FormType::Application, Locale::En, FormRecord::new());
        state.edit_field(FieldKey::FullName, "Ahmed Ali");
        state.edit_field(FieldKey::NationalId, "1234567890");
        state.edit_field(FieldKey::Phone, "0551234567");
        state.edit_field(FieldKey::Email, "ahmed@example.com");
        state.edit_field(FieldKey::MonthlyIncome, 9000);
        state.edit_field(FieldKey::ConsentTerms, true);
        state.edit_field(FieldKey::ConsentPdpl, true);
        for _ in 0..3 {
            state.next();
        }
        assert!(state.is_last_step());
        state.begin_submit(ReferencePolicy::FreshPerAttempt, mint);
        state.complete_submit(false);

        assert!(state.previous());
        assert_eq!(state.status(), SubmissionStatus::Idle);
        assert!(state.submission_notice().is_none());
        assert_eq!(state.step_index(), 2);
    }

    #[test]
    fn test_dismiss_failure() {
        let mut state = valid_contact();
        state.begin_submit(ReferencePolicy::FreshPerAttempt, mint);
        state.complete_submit(false);
        assert!(state.dismiss_failure());
        assert_eq!(state.status(), SubmissionStatus::Idle);
        assert!(!state.dismiss_failure());
    }

    #[test]
    fn test_complete_without_submit_is_noop() {
        let mut state = valid_contact();
        assert_eq!(state.complete_submit(true), SubmissionStatus::Idle);
    }

    #[test]
    fn test_set_locale_relocalizes_errors() {
        let mut state = WizardState::new(FormType::Contact, Locale::En, FormRecord::new());
        state.next();
        let en = state.errors()[&FieldKey::Phone].text.clone();
        state.set_locale(Locale::Ar);
        let ar = &state.errors()[&FieldKey::Phone];
        assert_eq!(ar.key, MessageKey::InvalidPhone);
        assert_ne!(ar.text, en);
    }

    #[test]
    fn test_state_serializes() {
        let state = valid_contact();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["form_type"], "contact");
        assert_eq!(json["phase"]["phase"], "editing");
        assert_eq!(json["record"]["consentPDPL"], true);
    }

    #[test]
    fn test_restore_round_trips() {
        let mut state = valid_contact();
        state.next();
        let restored: WizardState =
            serde_json::from_value(serde_json::to_value(&state).unwrap()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_restore_rejects_step_out_of_range() {
        let mut json = serde_json::to_value(valid_contact()).unwrap();
        json["step_index"] = serde_json::json!(3);

        let err = serde_json::from_value::<WizardState>(json).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);
    }
}
