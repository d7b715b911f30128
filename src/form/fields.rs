//! Field vocabulary and the form record
//!
//! `FieldKey` is the closed set of inputs any lead form can collect.
//! `FormRecord` holds the values entered so far, keyed by field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of one input in the lead forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    NationalId,
    DateOfBirth,
    Nationality,
    Phone,
    Email,
    EmploymentType,
    Employer,
    MonthlyIncome,
    FinancingType,
    RequestedAmount,
    Tenure,
    Message,
    Subject,
    ConsentMarketing,
    ConsentTerms,
    #[serde(rename = "consentPDPL")]
    ConsentPdpl,
}

impl FieldKey {
    pub const ALL: [FieldKey; 17] = [
        FieldKey::FullName,
        FieldKey::NationalId,
        FieldKey::DateOfBirth,
        FieldKey::Nationality,
        FieldKey::Phone,
        FieldKey::Email,
        FieldKey::EmploymentType,
        FieldKey::Employer,
        FieldKey::MonthlyIncome,
        FieldKey::FinancingType,
        FieldKey::RequestedAmount,
        FieldKey::Tenure,
        FieldKey::Message,
        FieldKey::Subject,
        FieldKey::ConsentMarketing,
        FieldKey::ConsentTerms,
        FieldKey::ConsentPdpl,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::FullName => "fullName",
            FieldKey::NationalId => "nationalId",
            FieldKey::DateOfBirth => "dateOfBirth",
            FieldKey::Nationality => "nationality",
            FieldKey::Phone => "phone",
            FieldKey::Email => "email",
            FieldKey::EmploymentType => "employmentType",
            FieldKey::Employer => "employer",
            FieldKey::MonthlyIncome => "monthlyIncome",
            FieldKey::FinancingType => "financingType",
            FieldKey::RequestedAmount => "requestedAmount",
            FieldKey::Tenure => "tenure",
            FieldKey::Message => "message",
            FieldKey::Subject => "subject",
            FieldKey::ConsentMarketing => "consentMarketing",
            FieldKey::ConsentTerms => "consentTerms",
            FieldKey::ConsentPdpl => "consentPDPL",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// How the presentation layer should render this field.
    pub fn input_kind(self) -> InputKind {
        match self {
            FieldKey::FullName | FieldKey::Employer | FieldKey::Subject | FieldKey::Nationality => {
                InputKind::Text
            }
            FieldKey::NationalId | FieldKey::Phone => InputKind::Digits,
            FieldKey::Email => InputKind::Email,
            FieldKey::DateOfBirth => InputKind::Date,
            FieldKey::MonthlyIncome | FieldKey::RequestedAmount | FieldKey::Tenure => {
                InputKind::Number
            }
            FieldKey::EmploymentType | FieldKey::FinancingType => InputKind::Select,
            FieldKey::Message => InputKind::TextArea,
            FieldKey::ConsentMarketing | FieldKey::ConsentTerms | FieldKey::ConsentPdpl => {
                InputKind::Checkbox
            }
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hint for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    Digits,
    Email,
    Date,
    Number,
    Select,
    Checkbox,
}

/// A single field value.
///
/// Serialized untagged: strings, JSON numbers and booleans map directly.
/// Select fields carry their option code as `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Bool(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value. Text is accepted when it parses as a number,
    /// since form inputs usually arrive as strings.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => Decimal::from_str(s.trim().replace(',', "").as_str()).ok(),
            FieldValue::Bool(_) => None,
        }
    }
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(FieldValue::Text(s)),
            serde_json::Value::Bool(b) => Ok(FieldValue::Bool(b)),
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map(FieldValue::Number)
                .map_err(|e| format!("number {} out of range: {}", n, e)),
            other => Err(format!("unsupported field value: {}", other)),
        }
    }
}

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => serde_json::Value::String(s),
            FieldValue::Bool(b) => serde_json::Value::Bool(b),
            FieldValue::Number(n) => serde_json::Number::from_str(&n.normalize().to_string())
                .map(serde_json::Value::Number)
                .unwrap_or_else(|_| serde_json::Value::String(n.to_string())),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Decimal> for FieldValue {
    fn from(n: Decimal) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(Decimal::from(n))
    }
}

/// Values entered so far, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<FieldValue>) {
        self.values.insert(key, value.into());
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<FieldValue> {
        self.values.remove(&key)
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: Into<FieldValue>> FromIterator<(FieldKey, V)> for FormRecord {
    fn from_iter<I: IntoIterator<Item = (FieldKey, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

/// Options for the employment type select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Government,
    Private,
    Military,
    Retired,
    SelfEmployed,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 5] = [
        EmploymentType::Government,
        EmploymentType::Private,
        EmploymentType::Military,
        EmploymentType::Retired,
        EmploymentType::SelfEmployed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            EmploymentType::Government => "government",
            EmploymentType::Private => "private",
            EmploymentType::Military => "military",
            EmploymentType::Retired => "retired",
            EmploymentType::SelfEmployed => "self_employed",
        }
    }
}

/// Options for the financing type select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingType {
    Personal,
    Auto,
    RealEstate,
    Sme,
}

impl FinancingType {
    pub const ALL: [FinancingType; 4] = [
        FinancingType::Personal,
        FinancingType::Auto,
        FinancingType::RealEstate,
        FinancingType::Sme,
    ];

    pub fn code(self) -> &'static str {
        match self {
            FinancingType::Personal => "personal",
            FinancingType::Auto => "auto",
            FinancingType::RealEstate => "real_estate",
            FinancingType::Sme => "sme",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_key_wire_names_match_serde() {
        for key in FieldKey::ALL {
            let encoded = serde_json::to_value(key).unwrap();
            assert_eq!(encoded, json!(key.as_str()));
            assert_eq!(FieldKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_field_value_from_json() {
        let record: FormRecord = serde_json::from_value(json!({
            "phone": "0512345678",
            "monthlyIncome": 4500,
            "consentPDPL": true
        }))
        .unwrap();

        assert_eq!(record.text(FieldKey::Phone), Some("0512345678"));
        assert_eq!(
            record.get(FieldKey::MonthlyIncome),
            Some(&FieldValue::Number(Decimal::from(4500)))
        );
        assert_eq!(
            record.get(FieldKey::ConsentPdpl).and_then(FieldValue::as_bool),
            Some(true)
        );
    }

    #[test]
    fn test_null_value_rejected() {
        let result: Result<FormRecord, _> = serde_json::from_value(json!({ "phone": null }));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_text_as_decimal() {
        assert_eq!(
            FieldValue::from("12,500").as_decimal(),
            Some(Decimal::from(12500))
        );
        assert_eq!(FieldValue::from("abc").as_decimal(), None);
        assert_eq!(FieldValue::from(true).as_decimal(), None);
    }

    #[test]
    fn test_number_serializes_as_json_number() {
        let value = serde_json::to_value(FieldValue::from(60)).unwrap();
        assert_eq!(value, json!(60));
    }
}
