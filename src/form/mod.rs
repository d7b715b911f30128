//! Form definitions: field vocabulary, validators and the step catalog.

pub mod catalog;
pub mod fields;
pub mod validators;

pub use catalog::{steps_for, verify_catalog, FieldSpec, FormType, SelectOption, StepDefinition, StepId};
pub use fields::{EmploymentType, FieldKey, FieldValue, FinancingType, FormRecord, InputKind};
pub use validators::{validate_field, ValidationResult};
