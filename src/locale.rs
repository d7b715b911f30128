//! Localization
//!
//! Every user-facing string the wizard produces goes through this module.
//! Validators and the step catalog only ever name a [`MessageKey`]; the text
//! for a key is looked up per [`Locale`] in [`MessageKey::text`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::form::fields::{EmploymentType, FieldKey, FinancingType};

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Arabic (site default)
    #[default]
    Ar,
    /// English
    En,
}

/// Text direction the presentation layer should lay content out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ar, Locale::En];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Locale::Ar => Direction::Rtl,
            Locale::En => Direction::Ltr,
        }
    }

    /// Parse a locale tag, tolerating case and region suffixes (`en-GB`, `ar_SA`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "ar" => Some(Locale::Ar),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a localized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "arg", rename_all = "snake_case")]
pub enum MessageKey {
    // ─────────────────────────────────────────────────────────────────────────
    // Step titles and descriptions
    // ─────────────────────────────────────────────────────────────────────────
    PersonalInfoTitle,
    PersonalInfoDescription,
    EmploymentTitle,
    EmploymentDescription,
    FinancingRequestTitle,
    FinancingRequestDescription,
    ConsentTitle,
    ConsentDescription,
    ContactTitle,
    ContactDescription,
    ComplaintTitle,
    ComplaintDescription,
    InquiryTitle,
    InquiryDescription,

    // ─────────────────────────────────────────────────────────────────────────
    // Field labels and select options
    // ─────────────────────────────────────────────────────────────────────────
    FieldLabel(FieldKey),
    EmploymentOption(EmploymentType),
    FinancingOption(FinancingType),

    // ─────────────────────────────────────────────────────────────────────────
    // Validation errors
    // ─────────────────────────────────────────────────────────────────────────
    NameTooShort,
    InvalidNationalId,
    InvalidPhone,
    InvalidEmail,
    IncomeBelowMinimum,
    MessageTooShort,
    ConsentRequired,

    // ─────────────────────────────────────────────────────────────────────────
    // Submission notices
    // ─────────────────────────────────────────────────────────────────────────
    SubmissionFailed,
    SubmissionSucceeded,
}

impl MessageKey {
    /// Resolve this key to display text.
    pub fn text(self, locale: Locale) -> &'static str {
        use MessageKey::*;
        match (self, locale) {
            (PersonalInfoTitle, Locale::Ar) => "المعلومات الشخصية",
            (PersonalInfoTitle, Locale::En) => "Personal Information",
            (PersonalInfoDescription, Locale::Ar) => "أدخل بياناتك الشخصية كما في الهوية",
            (PersonalInfoDescription, Locale::En) => "Enter your details as shown on your ID",
            (EmploymentTitle, Locale::Ar) => "معلومات العمل",
            (EmploymentTitle, Locale::En) => "Employment Details",
            (EmploymentDescription, Locale::Ar) => "أخبرنا عن جهة عملك ودخلك الشهري",
            (EmploymentDescription, Locale::En) => "Tell us about your employer and monthly income",
            (FinancingRequestTitle, Locale::Ar) => "طلب التمويل",
            (FinancingRequestTitle, Locale::En) => "Financing Request",
            (FinancingRequestDescription, Locale::Ar) => "اختر نوع التمويل والمبلغ والمدة",
            (FinancingRequestDescription, Locale::En) => {
                "Choose the financing type, amount and tenure"
            }
            (ConsentTitle, Locale::Ar) => "الموافقات",
            (ConsentTitle, Locale::En) => "Consent",
            (ConsentDescription, Locale::Ar) => "راجع الشروط وسياسة حماية البيانات",
            (ConsentDescription, Locale::En) => "Review the terms and data protection policy",
            (ContactTitle, Locale::Ar) => "تواصل معنا",
            (ContactTitle, Locale::En) => "Contact Us",
            (ContactDescription, Locale::Ar) => "سيتواصل معك فريقنا في أقرب وقت",
            (ContactDescription, Locale::En) => "Our team will get back to you shortly",
            (ComplaintTitle, Locale::Ar) => "تقديم شكوى",
            (ComplaintTitle, Locale::En) => "Submit a Complaint",
            (ComplaintDescription, Locale::Ar) => "صف المشكلة وسنعالجها وفق الأنظمة",
            (ComplaintDescription, Locale::En) => {
                "Describe the issue and we will handle it per regulations"
            }
            (InquiryTitle, Locale::Ar) => "استفسار",
            (InquiryTitle, Locale::En) => "Inquiry",
            (InquiryDescription, Locale::Ar) => "اسألنا عن منتجات التمويل",
            (InquiryDescription, Locale::En) => "Ask us about our financing products",

            (FieldLabel(key), locale) => field_label(key, locale),
            (EmploymentOption(kind), locale) => employment_label(kind, locale),
            (FinancingOption(kind), locale) => financing_label(kind, locale),

            (NameTooShort, Locale::Ar) => "يجب أن يتكون الاسم من 3 أحرف على الأقل",
            (NameTooShort, Locale::En) => "Name must be at least 3 characters",
            (InvalidNationalId, Locale::Ar) => "رقم الهوية الوطنية غير صحيح",
            (InvalidNationalId, Locale::En) => "Invalid national ID number",
            (InvalidPhone, Locale::Ar) => "رقم الجوال غير صحيح",
            (InvalidPhone, Locale::En) => "Invalid mobile number",
            (InvalidEmail, Locale::Ar) => "البريد الإلكتروني غير صحيح",
            (InvalidEmail, Locale::En) => "Invalid email address",
            (IncomeBelowMinimum, Locale::Ar) => "الحد الأدنى للدخل الشهري 4,000 ريال",
            (IncomeBelowMinimum, Locale::En) => "Minimum monthly income is SAR 4,000",
            (MessageTooShort, Locale::Ar) => "يجب أن تتكون الرسالة من 10 أحرف على الأقل",
            (MessageTooShort, Locale::En) => "Message must be at least 10 characters",
            (ConsentRequired, Locale::Ar) => "يجب الموافقة للمتابعة",
            (ConsentRequired, Locale::En) => "You must agree to continue",

            (SubmissionFailed, Locale::Ar) => "حدث خطأ أثناء الإرسال. يرجى المحاولة مرة أخرى",
            (SubmissionFailed, Locale::En) => "Something went wrong. Please try again",
            (SubmissionSucceeded, Locale::Ar) => "تم استلام طلبك بنجاح",
            (SubmissionSucceeded, Locale::En) => "Your request has been received",
        }
    }

    pub fn localize(self, locale: Locale) -> LocalizedMessage {
        LocalizedMessage {
            key: self,
            text: self.text(locale).to_string(),
        }
    }
}

fn field_label(key: FieldKey, locale: Locale) -> &'static str {
    let (ar, en) = match key {
        FieldKey::FullName => ("الاسم الكامل", "Full Name"),
        FieldKey::NationalId => ("رقم الهوية", "National ID"),
        FieldKey::DateOfBirth => ("تاريخ الميلاد", "Date of Birth"),
        FieldKey::Nationality => ("الجنسية", "Nationality"),
        FieldKey::Phone => ("رقم الجوال", "Mobile Number"),
        FieldKey::Email => ("البريد الإلكتروني", "Email"),
        FieldKey::EmploymentType => ("نوع العمل", "Employment Type"),
        FieldKey::Employer => ("جهة العمل", "Employer"),
        FieldKey::MonthlyIncome => ("الدخل الشهري", "Monthly Income"),
        FieldKey::FinancingType => ("نوع التمويل", "Financing Type"),
        FieldKey::RequestedAmount => ("المبلغ المطلوب", "Requested Amount"),
        FieldKey::Tenure => ("مدة التمويل (بالأشهر)", "Tenure (months)"),
        FieldKey::Message => ("الرسالة", "Message"),
        FieldKey::Subject => ("الموضوع", "Subject"),
        FieldKey::ConsentMarketing => (
            "أوافق على تلقي العروض التسويقية",
            "I agree to receive marketing offers",
        ),
        FieldKey::ConsentTerms => ("أوافق على الشروط والأحكام", "I agree to the terms and conditions"),
        FieldKey::ConsentPdpl => (
            "أوافق على معالجة بياناتي وفق نظام حماية البيانات الشخصية",
            "I consent to processing of my data under the PDPL",
        ),
    };
    match locale {
        Locale::Ar => ar,
        Locale::En => en,
    }
}

fn employment_label(kind: EmploymentType, locale: Locale) -> &'static str {
    let (ar, en) = match kind {
        EmploymentType::Government => ("قطاع حكومي", "Government"),
        EmploymentType::Private => ("قطاع خاص", "Private Sector"),
        EmploymentType::Military => ("عسكري", "Military"),
        EmploymentType::Retired => ("متقاعد", "Retired"),
        EmploymentType::SelfEmployed => ("أعمال حرة", "Self-Employed"),
    };
    match locale {
        Locale::Ar => ar,
        Locale::En => en,
    }
}

fn financing_label(kind: FinancingType, locale: Locale) -> &'static str {
    let (ar, en) = match kind {
        FinancingType::Personal => ("تمويل شخصي", "Personal Financing"),
        FinancingType::Auto => ("تمويل السيارات", "Auto Financing"),
        FinancingType::RealEstate => ("تمويل عقاري", "Real Estate Financing"),
        FinancingType::Sme => ("تمويل المنشآت الصغيرة", "SME Financing"),
    };
    match locale {
        Locale::Ar => ar,
        Locale::En => en,
    }
}

/// A message key together with its text in the locale it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedMessage {
    pub key: MessageKey,
    pub text: String,
}

impl fmt::Display for LocalizedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
