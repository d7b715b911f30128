//! Lead-capture wizard for the financing website.
//!
//! A form engine that picks its steps from a static catalog by form type,
//! validates each step with localized field rules, moves forward and back
//! through the steps, and submits the finished record with a client-visible
//! reference number.
//!
//! ```ignore
//! let engine = WizardEngine::new(submitter, Arc::new(TracingSink), &WizardConfig::from_env()?)?;
//! let mut wizard = engine.start(FormType::Contact);
//! wizard.edit_field(FieldKey::FullName, "Ahmed Ali");
//! // ...
//! match wizard.submit().await {
//!     SubmitOutcome::Succeeded(reference) => println!("{}", reference),
//!     other => println!("{:?}", other),
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod locale;
pub mod submission;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{ConfigError, SubmissionError, WizardError};
pub use events::{EventPayload, EventSink, LeadEvent};
pub use form::{FieldKey, FieldValue, FormRecord, FormType, StepDefinition, StepId};
pub use locale::{Locale, LocalizedMessage, MessageKey};
pub use submission::{FnSubmitter, LeadSubmitter, SubmissionPayload};
pub use wizard::{LeadWizard, ReferenceNumber, ReferencePolicy, SubmitOutcome, WizardEngine, WizardState, WizardView};
