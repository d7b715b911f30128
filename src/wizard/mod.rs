//! Wizard state machine, reference numbers and the presentation snapshot.

pub mod engine;
pub mod reference;
pub mod state;
pub mod view;

pub use engine::{LeadWizard, SubmitOutcome, WizardEngine};
pub use reference::{ReferenceNumber, ReferencePolicy};
pub use state::{ErrorMap, NextOutcome, SubmissionStatus, SubmissionTicket, SubmitStart, WizardPhase, WizardState};
pub use view::{FieldView, StepView, WizardView};
