//! Read-only snapshot handed to the presentation layer after each transition.

use serde::Serialize;

use super::state::{SubmissionStatus, WizardState};
use crate::form::{FieldSpec, FieldValue, FormType, StepId};
use crate::locale::{Direction, Locale, LocalizedMessage, MessageKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub form_type: FormType,
    pub locale: Locale,
    pub direction: Direction,
    pub step: StepView,
    /// 1-based
    pub step_number: usize,
    pub step_count: usize,
    pub progress: u8,
    pub status: SubmissionStatus,
    pub can_go_back: bool,
    pub is_last_step: bool,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<LocalizedMessage>,
    /// All field errors of the current step, in display order
    pub form_errors: Vec<LocalizedMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub id: StepId,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub spec: FieldSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LocalizedMessage>,
}

impl WizardView {
    pub fn from_state(state: &WizardState) -> Self {
        let locale = state.locale;
        let step = state.current_step();
        let accepts_input = state.accepts_input();

        let fields: Vec<FieldView> = step
            .field_specs(locale)
            .into_iter()
            .map(|spec| FieldView {
                value: state.record().get(spec.key).cloned(),
                error: state.errors().get(&spec.key).cloned(),
                spec,
            })
            .collect();
        let form_errors = fields.iter().filter_map(|f| f.error.clone()).collect();

        Self {
            form_type: state.form_type,
            locale,
            direction: locale.direction(),
            step: StepView {
                id: step.id,
                title: step.title(locale),
                description: step.description(locale),
                fields,
            },
            step_number: state.step_index() + 1,
            step_count: state.step_count(),
            progress: state.progress(),
            status: state.status(),
            can_go_back: accepts_input && state.step_index() > 0,
            is_last_step: state.is_last_step(),
            can_submit: accepts_input && state.is_last_step(),
            reference_number: state.reference().map(|r| r.to_string()),
            notice: match state.status() {
                SubmissionStatus::Succeeded => Some(MessageKey::SubmissionSucceeded.localize(locale)),
                _ => state.submission_notice().cloned(),
            },
            form_errors,
        }
    }
}
