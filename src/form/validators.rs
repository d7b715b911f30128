//! Field Validators
//!
//! One pure function per validated field. A validator sees only the value of
//! its own field and the display locale; it never reads other fields and never
//! touches the record.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use super::fields::{FieldKey, FieldValue};
use crate::locale::{Locale, LocalizedMessage, MessageKey};

/// Minimum accepted monthly income, in SAR.
pub const MIN_MONTHLY_INCOME: Decimal = Decimal::from_parts(4000, 0, 0, false, 0);

pub const MIN_NAME_CHARS: usize = 3;
pub const MIN_MESSAGE_CHARS: usize = 10;

/// National ID: 10 digits, leading 1 (citizen) or 2 (resident)
static NATIONAL_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[12]\d{9}$").unwrap());

/// Local mobile number: 05 followed by 8 digits
static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^05\d{8}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result", content = "message")]
pub enum ValidationResult {
    Ok,
    Invalid(LocalizedMessage),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Ok)
    }

    pub fn into_error(self) -> Option<LocalizedMessage> {
        match self {
            ValidationResult::Ok => None,
            ValidationResult::Invalid(msg) => Some(msg),
        }
    }

    fn check(passed: bool, key: MessageKey, locale: Locale) -> Self {
        if passed {
            ValidationResult::Ok
        } else {
            ValidationResult::Invalid(key.localize(locale))
        }
    }
}

/// Signature shared by all field validators.
pub type Validator = fn(Option<&FieldValue>, Locale) -> ValidationResult;

/// The validator registered for `key`, if the field has one.
pub fn validator_for(key: FieldKey) -> Option<Validator> {
    match key {
        FieldKey::FullName => Some(validate_full_name),
        FieldKey::NationalId => Some(validate_national_id),
        FieldKey::Phone => Some(validate_phone),
        FieldKey::Email => Some(validate_email),
        FieldKey::MonthlyIncome => Some(validate_monthly_income),
        FieldKey::Message => Some(validate_message),
        FieldKey::ConsentTerms | FieldKey::ConsentPdpl => Some(validate_consent),
        FieldKey::DateOfBirth
        | FieldKey::Nationality
        | FieldKey::EmploymentType
        | FieldKey::Employer
        | FieldKey::FinancingType
        | FieldKey::RequestedAmount
        | FieldKey::Tenure
        | FieldKey::Subject
        | FieldKey::ConsentMarketing => None,
    }
}

/// Validate a single field. Fields without a validator always pass.
pub fn validate_field(key: FieldKey, value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    match validator_for(key) {
        Some(validator) => validator(value, locale),
        None => ValidationResult::Ok,
    }
}

fn trimmed_text(value: Option<&FieldValue>) -> Option<&str> {
    value.and_then(FieldValue::as_text).map(str::trim)
}

/// Characters after NFC composition. Decomposed Latin accents ("e" + U+0301)
/// count once; Arabic harakat have no precomposed form and count separately.
fn char_count(text: &str) -> usize {
    text.nfc().count()
}

pub fn validate_full_name(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let long_enough = trimmed_text(value).is_some_and(|s| char_count(s) >= MIN_NAME_CHARS);
    ValidationResult::check(long_enough, MessageKey::NameTooShort, locale)
}

pub fn validate_national_id(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let matches = trimmed_text(value).is_some_and(|s| NATIONAL_ID_RE.is_match(s));
    ValidationResult::check(matches, MessageKey::InvalidNationalId, locale)
}

pub fn validate_phone(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let matches = trimmed_text(value).is_some_and(|s| MOBILE_RE.is_match(s));
    ValidationResult::check(matches, MessageKey::InvalidPhone, locale)
}

pub fn validate_email(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let matches = trimmed_text(value).is_some_and(|s| EMAIL_RE.is_match(s));
    ValidationResult::check(matches, MessageKey::InvalidEmail, locale)
}

pub fn validate_monthly_income(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let sufficient = value
        .and_then(FieldValue::as_decimal)
        .is_some_and(|income| income >= MIN_MONTHLY_INCOME);
    ValidationResult::check(sufficient, MessageKey::IncomeBelowMinimum, locale)
}

pub fn validate_message(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let long_enough = trimmed_text(value).is_some_and(|s| char_count(s) >= MIN_MESSAGE_CHARS);
    ValidationResult::check(long_enough, MessageKey::MessageTooShort, locale)
}

/// Consent must be explicitly `true`; absent or `false` is rejected.
pub fn validate_consent(value: Option<&FieldValue>, locale: Locale) -> ValidationResult {
    let agreed = value.and_then(FieldValue::as_bool) == Some(true);
    ValidationResult::check(agreed, MessageKey::ConsentRequired, locale)
}
