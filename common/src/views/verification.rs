use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Certificate, CertificateStatus};

/// Outcome of looking up a certificate id from a verification link.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationResult {
    pub verified: bool,

    /// The id that was submitted, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_id: Option<String>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<VerifiedCertificate>,
}

/// The public subset of a certificate shown on the verification page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VerifiedCertificate {
    pub id: String,
    pub intern_name: String,
    pub internship_program: String,
    pub company_name: String,
    pub issue_date: chrono::NaiveDate,
    pub status: CertificateStatus,
}

impl From<&Certificate> for VerifiedCertificate {
    fn from(value: &Certificate) -> Self {
        Self {
            id: value.id.clone(),
            intern_name: value.intern_name.clone(),
            internship_program: value.internship_program.clone(),
            company_name: value.company_name.clone(),
            issue_date: value.issue_date,
            status: value.status,
        }
    }
}
