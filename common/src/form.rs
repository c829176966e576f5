//! Rules of the certificate generator form: required fields, defaults and id
//! generation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    params::{CreateCertificateParams, UpdateCertificateParams},
    views::{Certificate, CertificateStatus, ImageRef, ImageRefError},
};

pub const DEFAULT_ID_PREFIX: &str = "TECH";
pub const DEFAULT_COMPANY_NAME: &str = "Tech Instance";

/// Durations offered by the form. The field itself stays free text.
pub const DURATION_PRESETS: [&str; 4] = [
    "1-month internship",
    "2-month internship",
    "3-month internship",
    "6-month internship",
];

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_SUFFIX_LEN: usize = 7;
const MAX_ID_LEN: usize = 64;
const DEFAULT_SPAN_DAYS: i64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid certificate id '{0}'")]
    InvalidId(String),

    #[error(transparent)]
    InvalidImage(#[from] ImageRefError),
}

impl ValidationError {
    /// Title of the inline notice shown to the operator.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "Missing Information",
            ValidationError::InvalidId(_) => "Invalid Certificate ID",
            ValidationError::InvalidImage(_) => "Invalid Image",
        }
    }

    pub fn description(&self) -> String {
        match self {
            ValidationError::MissingFields(_) => "Please fill in all required fields.".into(),
            ValidationError::InvalidId(id) => format!(
                "'{id}' cannot be used as a certificate ID. Use up to {MAX_ID_LEN} characters without spaces."
            ),
            ValidationError::InvalidImage(_) => {
                "The intern photo must be an uploaded image.".into()
            }
        }
    }
}

/// Values the form is pre-filled with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormDefaults {
    pub id: String,
    pub company_name: String,
    pub duration: String,
    pub duration_presets: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct CertificateForm {
    id_prefix: String,
    company_name: String,
}

impl Default for CertificateForm {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX, DEFAULT_COMPANY_NAME)
    }
}

impl CertificateForm {
    pub fn new(id_prefix: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            company_name: company_name.into(),
        }
    }

    /// A fresh `<PREFIX>-XXXXXXX` id with a random base-36 suffix.
    pub fn generate_id(&self) -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();

        format!("{}-{}", self.id_prefix, suffix)
    }

    pub fn defaults(&self, today: NaiveDate) -> FormDefaults {
        FormDefaults {
            id: self.generate_id(),
            company_name: self.company_name.clone(),
            duration: DURATION_PRESETS[0].to_string(),
            duration_presets: DURATION_PRESETS.iter().map(|d| d.to_string()).collect(),
            start_date: today - Duration::days(DEFAULT_SPAN_DAYS),
            end_date: today,
        }
    }

    pub fn validate(params: &CreateCertificateParams) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if params.intern_name.trim().is_empty() {
            missing.push("intern_name");
        }
        if params.internship_program.trim().is_empty() {
            missing.push("internship_program");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if let Some(id) = &params.id {
            validate_id(id)?;
        }

        validate_image(&params.intern_image)
    }

    /// An edit may leave required fields untouched but may not blank them.
    pub fn validate_update(params: &UpdateCertificateParams) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if params
            .intern_name
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            missing.push("intern_name");
        }
        if params
            .internship_program
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            missing.push("internship_program");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        match &params.intern_image {
            Some(image) => validate_image(image),
            None => Ok(()),
        }
    }

    /// Validate a submission and turn it into a new, active certificate
    /// issued at `now`.
    pub fn build(
        &self,
        params: CreateCertificateParams,
        now: DateTime<Utc>,
    ) -> Result<Certificate, ValidationError> {
        Self::validate(&params)?;

        let today = now.date_naive();
        let defaults = self.defaults(today);

        Ok(Certificate {
            id: params
                .id
                .map(|id| id.trim().to_string())
                .unwrap_or(defaults.id),
            intern_name: params.intern_name.trim().to_string(),
            internship_program: params.internship_program.trim().to_string(),
            company_name: non_blank(params.company_name).unwrap_or(defaults.company_name),
            duration: non_blank(params.duration).unwrap_or(defaults.duration),
            start_date: params.start_date.unwrap_or(defaults.start_date),
            end_date: params.end_date.unwrap_or(defaults.end_date),
            issue_date: today,
            status: CertificateStatus::Active,
            score: non_blank(params.score),
            assignments: non_blank(params.assignments),
            exam: non_blank(params.exam),
            total_candidates: non_blank(params.total_candidates),
            intern_image: params.intern_image,
            custom_description: non_blank(params.custom_description),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Blank optional text counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_image(image: &ImageRef) -> Result<(), ValidationError> {
    if let Some(url) = image.data_url() {
        ImageRef::from_data_url(url)?;
    }
    Ok(())
}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_ID_LEN || trimmed.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn params(name: &str, program: &str) -> CreateCertificateParams {
        CreateCertificateParams {
            intern_name: name.into(),
            internship_program: program.into(),
            ..Default::default()
        }
    }

    #[test]
    fn generated_ids_use_prefix_and_base36_suffix() {
        let form = CertificateForm::default();
        let id = form.generate_id();

        let suffix = id.strip_prefix("TECH-").expect("prefix");
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn missing_required_fields_are_reported_together() {
        let err = CertificateForm::validate(&params("  ", "")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["intern_name", "internship_program"])
        );
        assert_eq!(err.title(), "Missing Information");
        assert_eq!(err.description(), "Please fill in all required fields.");
    }

    #[test]
    fn build_applies_defaults() {
        let form = CertificateForm::default();
        let cert = form
            .build(params("Jane Doe", "Full Stack Development"), now())
            .unwrap();

        assert!(cert.id.starts_with("TECH-"));
        assert_eq!(cert.company_name, "Tech Instance");
        assert_eq!(cert.duration, "1-month internship");
        assert_eq!(cert.issue_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(cert.end_date, cert.issue_date);
        assert_eq!(cert.start_date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(cert.status, CertificateStatus::Active);
        assert!(!cert.has_performance());
    }

    #[test]
    fn build_keeps_explicit_values_and_drops_blank_optionals() {
        let form = CertificateForm::new("ACME", "Acme Corp");
        let mut p = params("  John Smith ", "UI/UX Design");
        p.id = Some("ACME-0000001".into());
        p.duration = Some("2-month internship".into());
        p.score = Some("92%".into());
        p.exam = Some("   ".into());

        let cert = form.build(p, now()).unwrap();

        assert_eq!(cert.id, "ACME-0000001");
        assert_eq!(cert.intern_name, "John Smith");
        assert_eq!(cert.company_name, "Acme Corp");
        assert_eq!(cert.duration, "2-month internship");
        assert_eq!(cert.score.as_deref(), Some("92%"));
        assert_eq!(cert.exam, None);
        assert!(cert.has_performance());
    }

    #[test]
    fn explicit_ids_with_whitespace_are_rejected() {
        let mut p = params("Jane", "Data Science");
        p.id = Some("TECH 123".into());
        assert_eq!(
            CertificateForm::validate(&p),
            Err(ValidationError::InvalidId("TECH 123".into()))
        );
    }

    #[test]
    fn updates_may_not_blank_required_fields() {
        let update = UpdateCertificateParams {
            intern_name: Some("".into()),
            ..Default::default()
        };
        assert!(CertificateForm::validate_update(&update).is_err());

        let update = UpdateCertificateParams {
            duration: Some("3-month internship".into()),
            ..Default::default()
        };
        assert!(CertificateForm::validate_update(&update).is_ok());
    }

    #[test]
    fn intern_photo_must_be_a_data_url() {
        let mut p = params("Jane", "Data Science");
        p.intern_image = ImageRef::Inline("https://evil.example/x.png".into());
        let err = CertificateForm::validate(&p).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidImage(_)));
        assert_eq!(err.title(), "Invalid Image");

        p.intern_image = ImageRef::inline("image/png", b"png");
        assert!(CertificateForm::validate(&p).is_ok());

        let update = UpdateCertificateParams {
            intern_image: Some(ImageRef::Inline("javascript:alert(1)".into())),
            ..Default::default()
        };
        assert!(matches!(
            CertificateForm::validate_update(&update),
            Err(ValidationError::InvalidImage(_))
        ));
    }

    #[test]
    fn defaults_span_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let defaults = CertificateForm::default().defaults(today);

        assert_eq!(defaults.end_date, today);
        assert_eq!((defaults.end_date - defaults.start_date).num_days(), 30);
        assert_eq!(defaults.duration_presets.len(), DURATION_PRESETS.len());
    }
}
