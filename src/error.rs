//! Error types for the lead wizard
//!
//! Field validation failures are not errors here: they are data, carried in
//! the wizard's error map. These types cover configuration problems, misuse of
//! the wizard API, and failures of the external submission call.

use thiserror::Error;

use crate::form::{FieldKey, FormType, StepId};

/// Startup configuration errors. These are programmer errors and should stop
/// the host before any wizard is shown.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Form type '{0}' has no steps in the catalog")]
    EmptyCatalog(FormType),

    #[error("Step '{step}' appears more than once for form type '{form_type}'")]
    DuplicateStep { form_type: FormType, step: StepId },

    #[error("Step '{step}' of form type '{form_type}' owns no fields")]
    EmptyStep { form_type: FormType, step: StepId },

    #[error("Field '{0}' has a validator but no step owns it")]
    UnownedField(FieldKey),

    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    #[error("Invalid submission URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Misuse of the wizard API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Step index {index} out of range (form has {count} steps)")]
    StepOutOfRange { index: usize, count: usize },
}

/// Failure of the external submission call. Logged, never shown verbatim.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Submission endpoint rejected the lead with status {status}")]
    Rejected { status: u16 },

    #[error("Submission transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Submission handler failed: {0}")]
    Handler(String),
}

impl SubmissionError {
    pub fn handler(message: impl Into<String>) -> Self {
        SubmissionError::Handler(message.into())
    }
}
