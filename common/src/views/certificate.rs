use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ImageRef;

/// An internship certificate issued by the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Certificate {
    /// Certificate identifier, e.g. `TECH-XYZ1234`. Never changes once issued.
    pub id: String,

    pub intern_name: String,
    pub internship_program: String,
    pub company_name: String,

    /// Free-text duration, e.g. `2-month internship`.
    pub duration: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Set when the certificate is issued and never changed by edits.
    pub issue_date: NaiveDate,

    pub status: CertificateStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_candidates: Option<String>,

    #[serde(default)]
    pub intern_image: ImageRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    /// Whether any of the optional performance fields are filled in.
    pub fn has_performance(&self) -> bool {
        [
            &self.score,
            &self.assignments,
            &self.exam,
            &self.total_candidates,
        ]
        .iter()
        .any(|field| field.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum CertificateStatus {
    #[default]
    Active,
    Revoked,
}

impl CertificateStatus {
    /// The status a toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            CertificateStatus::Active => CertificateStatus::Revoked,
            CertificateStatus::Revoked => CertificateStatus::Active,
        }
    }
}

impl Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CertificateStatus::Active => write!(f, "Active"),
            CertificateStatus::Revoked => write!(f, "Revoked"),
        }
    }
}
