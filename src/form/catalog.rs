//! Step Catalog
//!
//! Static mapping from [`FormType`] to the ordered steps of that form. The
//! wizard only ever consumes this table; adding a form type means adding an
//! entry here and nothing else.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::fields::{EmploymentType, FieldKey, FinancingType, InputKind};
use super::validators::validator_for;
use crate::error::ConfigError;
use crate::locale::{Locale, MessageKey};

/// Category of lead-capture flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Application,
    Contact,
    Complaint,
    Inquiry,
}

impl FormType {
    pub const ALL: [FormType; 4] = [
        FormType::Application,
        FormType::Contact,
        FormType::Complaint,
        FormType::Inquiry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormType::Application => "application",
            FormType::Contact => "contact",
            FormType::Complaint => "complaint",
            FormType::Inquiry => "inquiry",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Three-letter prefix of reference numbers minted for this form.
    pub fn reference_prefix(self) -> &'static str {
        match self {
            FormType::Application => "APP",
            FormType::Complaint => "CMP",
            FormType::Contact | FormType::Inquiry => "INQ",
        }
    }

    pub fn steps(self) -> &'static [StepDefinition] {
        steps_for(self)
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a step within a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    PersonalInfo,
    Employment,
    FinancingRequest,
    Consent,
    ContactDetails,
    ComplaintDetails,
    InquiryDetails,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::PersonalInfo => "personal-info",
            StepId::Employment => "employment",
            StepId::FinancingRequest => "financing-request",
            StepId::Consent => "consent",
            StepId::ContactDetails => "contact-details",
            StepId::ComplaintDetails => "complaint-details",
            StepId::InquiryDetails => "inquiry-details",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a form: the fields presented and validated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: MessageKey,
    pub description: Option<MessageKey>,
    pub fields: &'static [FieldKey],
}

impl StepDefinition {
    pub fn title(&self, locale: Locale) -> &'static str {
        self.title.text(locale)
    }

    pub fn description(&self, locale: Locale) -> Option<&'static str> {
        self.description.map(|d| d.text(locale))
    }

    pub fn owns(&self, key: FieldKey) -> bool {
        self.fields.contains(&key)
    }

    /// Presentation metadata for each field, in display order.
    pub fn field_specs(&self, locale: Locale) -> Vec<FieldSpec> {
        self.fields
            .iter()
            .map(|&key| FieldSpec::new(key, locale))
            .collect()
    }
}

/// What the presentation layer needs to render one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl FieldSpec {
    pub fn new(key: FieldKey, locale: Locale) -> Self {
        Self {
            key,
            label: MessageKey::FieldLabel(key).text(locale),
            kind: key.input_kind(),
            required: validator_for(key).is_some(),
            options: select_options(key, locale),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

fn select_options(key: FieldKey, locale: Locale) -> Vec<SelectOption> {
    match key {
        FieldKey::EmploymentType => EmploymentType::ALL
            .into_iter()
            .map(|t| SelectOption {
                value: t.code(),
                label: MessageKey::EmploymentOption(t).text(locale),
            })
            .collect(),
        FieldKey::FinancingType => FinancingType::ALL
            .into_iter()
            .map(|t| SelectOption {
                value: t.code(),
                label: MessageKey::FinancingOption(t).text(locale),
            })
            .collect(),
        _ => Vec::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog entries
// ─────────────────────────────────────────────────────────────────────────────

static APPLICATION_STEPS: [StepDefinition; 4] = [
    StepDefinition {
        id: StepId::PersonalInfo,
        title: MessageKey::PersonalInfoTitle,
        description: Some(MessageKey::PersonalInfoDescription),
        fields: &[
            FieldKey::FullName,
            FieldKey::NationalId,
            FieldKey::DateOfBirth,
            FieldKey::Nationality,
            FieldKey::Phone,
            FieldKey::Email,
        ],
    },
    StepDefinition {
        id: StepId::Employment,
        title: MessageKey::EmploymentTitle,
        description: Some(MessageKey::EmploymentDescription),
        fields: &[
            FieldKey::EmploymentType,
            FieldKey::Employer,
            FieldKey::MonthlyIncome,
        ],
    },
    StepDefinition {
        id: StepId::FinancingRequest,
        title: MessageKey::FinancingRequestTitle,
        description: Some(MessageKey::FinancingRequestDescription),
        fields: &[
            FieldKey::FinancingType,
            FieldKey::RequestedAmount,
            FieldKey::Tenure,
        ],
    },
    StepDefinition {
        id: StepId::Consent,
        title: MessageKey::ConsentTitle,
        description: Some(MessageKey::ConsentDescription),
        fields: &[
            FieldKey::ConsentTerms,
            FieldKey::ConsentPdpl,
            FieldKey::ConsentMarketing,
        ],
    },
];

static CONTACT_STEPS: [StepDefinition; 1] = [StepDefinition {
    id: StepId::ContactDetails,
    title: MessageKey::ContactTitle,
    description: Some(MessageKey::ContactDescription),
    fields: &[
        FieldKey::FullName,
        FieldKey::Phone,
        FieldKey::Email,
        FieldKey::Subject,
        FieldKey::Message,
        FieldKey::ConsentPdpl,
    ],
}];

static COMPLAINT_STEPS: [StepDefinition; 1] = [StepDefinition {
    id: StepId::ComplaintDetails,
    title: MessageKey::ComplaintTitle,
    description: Some(MessageKey::ComplaintDescription),
    fields: &[
        FieldKey::FullName,
        FieldKey::NationalId,
        FieldKey::Phone,
        FieldKey::Email,
        FieldKey::Subject,
        FieldKey::Message,
        FieldKey::ConsentPdpl,
    ],
}];

static INQUIRY_STEPS: [StepDefinition; 1] = [StepDefinition {
    id: StepId::InquiryDetails,
    title: MessageKey::InquiryTitle,
    description: Some(MessageKey::InquiryDescription),
    fields: &[
        FieldKey::FullName,
        FieldKey::Phone,
        FieldKey::Email,
        FieldKey::FinancingType,
        FieldKey::Message,
        FieldKey::ConsentPdpl,
    ],
}];

/// Ordered steps for a form type.
pub fn steps_for(form_type: FormType) -> &'static [StepDefinition] {
    match form_type {
        FormType::Application => &APPLICATION_STEPS,
        FormType::Contact => &CONTACT_STEPS,
        FormType::Complaint => &COMPLAINT_STEPS,
        FormType::Inquiry => &INQUIRY_STEPS,
    }
}

/// Check the catalog for a single form type.
pub fn verify_steps(form_type: FormType, steps: &[StepDefinition]) -> Result<(), ConfigError> {
    if steps.is_empty() {
        return Err(ConfigError::EmptyCatalog(form_type));
    }

    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.id) {
            return Err(ConfigError::DuplicateStep {
                form_type,
                step: step.id,
            });
        }
        if step.fields.is_empty() {
            return Err(ConfigError::EmptyStep {
                form_type,
                step: step.id,
            });
        }
    }

    Ok(())
}

/// Check every catalog entry. Run once at startup.
pub fn verify_catalog() -> Result<(), ConfigError> {
    FormType::ALL
        .into_iter()
        .try_for_each(|form_type| verify_steps(form_type, steps_for(form_type)))?;

    let owned: HashSet<FieldKey> = FormType::ALL
        .into_iter()
        .flat_map(|form_type| steps_for(form_type).iter())
        .flat_map(|step| step.fields.iter().copied())
        .collect();
    match FieldKey::ALL
        .into_iter()
        .find(|key| validator_for(*key).is_some() && !owned.contains(key))
    {
        Some(key) => Err(ConfigError::UnownedField(key)),
        None => Ok(()),
    }
}
