//! Client-visible reference numbers.
//!
//! Format: form-type prefix, then the UTC timestamp in milliseconds, then three
//! random digits. For example `APP1718035200123042`.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::form::FormType;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    /// Mint a new reference for `form_type` at the current time.
    pub fn generate(form_type: FormType) -> Self {
        Self::generate_at(form_type, Utc::now(), &mut rand::thread_rng())
    }

    pub fn generate_at<R: Rng + ?Sized>(form_type: FormType, at: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: u16 = rng.gen_range(0..1000);
        Self(format!(
            "{}{}{:03}",
            form_type.reference_prefix(),
            at.timestamp_millis(),
            suffix
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefix(&self) -> &str {
        &self.0[..3]
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a retried Submit does with the reference minted by a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Every Submit mints a new reference
    #[default]
    FreshPerAttempt,
    /// A retry after failure resends the previous reference so the backend can
    /// de-duplicate
    ReuseOnRetry,
}

impl ReferencePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fresh" | "fresh_per_attempt" => Some(ReferencePolicy::FreshPerAttempt),
            "reuse" | "reuse_on_retry" => Some(ReferencePolicy::ReuseOnRetry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;
    use regex::Regex;

    #[test]
    fn test_format() {
        let at = Utc.timestamp_millis_opt(1_718_035_200_123).unwrap();
        let mut rng = StepRng::new(0, 0);
        let reference = ReferenceNumber::generate_at(FormType::Application, at, &mut rng);
        assert_eq!(reference.as_str(), "APP1718035200123000");
        assert_eq!(reference.prefix(), "APP");
    }

    #[test]
    fn test_generated_reference_shape() {
        let pattern = Regex::new(r"^INQ\d+$").unwrap();
        for _ in 0..20 {
            let reference = ReferenceNumber::generate(FormType::Contact);
            assert!(pattern.is_match(reference.as_str()), "{}", reference);
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(ReferencePolicy::parse("reuse"), Some(ReferencePolicy::ReuseOnRetry));
        assert_eq!(ReferencePolicy::parse("FRESH"), Some(ReferencePolicy::FreshPerAttempt));
        assert_eq!(ReferencePolicy::parse("sometimes"), None);
    }
}
