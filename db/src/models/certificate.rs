use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use credence_common::{
    form::non_blank,
    params::UpdateCertificateParams,
    views::{Certificate, CertificateStatus, ImageRef},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbCertificate {
    pub id: String,
    pub intern_name: String,
    pub internship_program: String,
    pub company_name: String,
    pub duration: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub issue_date: NaiveDate,
    pub status: CertificateStatus,
    pub score: Option<String>,
    pub assignments: Option<String>,
    pub exam: Option<String>,
    pub total_candidates: Option<String>,
    pub intern_image: ImageRef,
    pub custom_description: Option<String>,
    pub created_at: DateTime<Utc>,

    /// Last time the record was edited or had its status toggled
    pub updated_at: DateTime<Utc>,
}

impl Display for DbCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DbCertificate {{ id: {}, intern_name: {}, status: {} }}",
            self.id, self.intern_name, self.status
        )
    }
}

impl DbCertificate {
    /// Merge an edit into this record. `id`, `issue_date` and `status` are
    /// never touched.
    pub fn apply(&mut self, patch: UpdateCertificateParams, now: DateTime<Utc>) {
        if let Some(v) = non_blank(patch.intern_name) {
            self.intern_name = v;
        }
        if let Some(v) = non_blank(patch.internship_program) {
            self.internship_program = v;
        }
        if let Some(v) = non_blank(patch.company_name) {
            self.company_name = v;
        }
        if let Some(v) = non_blank(patch.duration) {
            self.duration = v;
        }
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.score {
            self.score = non_blank(v);
        }
        if let Some(v) = patch.assignments {
            self.assignments = non_blank(v);
        }
        if let Some(v) = patch.exam {
            self.exam = non_blank(v);
        }
        if let Some(v) = patch.total_candidates {
            self.total_candidates = non_blank(v);
        }
        if let Some(v) = patch.intern_image {
            self.intern_image = v;
        }
        if let Some(v) = patch.custom_description {
            self.custom_description = non_blank(v);
        }

        self.updated_at = now;
    }

    /// Whether `term` appears in the id or intern name, ignoring case.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.id.to_lowercase().contains(&term) || self.intern_name.to_lowercase().contains(&term)
    }
}

impl From<Certificate> for DbCertificate {
    fn from(value: Certificate) -> Self {
        Self {
            id: value.id,
            intern_name: value.intern_name,
            internship_program: value.internship_program,
            company_name: value.company_name,
            duration: value.duration,
            start_date: value.start_date,
            end_date: value.end_date,
            issue_date: value.issue_date,
            status: value.status,
            score: value.score,
            assignments: value.assignments,
            exam: value.exam,
            total_candidates: value.total_candidates,
            intern_image: value.intern_image,
            custom_description: value.custom_description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<DbCertificate> for Certificate {
    fn from(value: DbCertificate) -> Self {
        Self {
            id: value.id,
            intern_name: value.intern_name,
            internship_program: value.internship_program,
            company_name: value.company_name,
            duration: value.duration,
            start_date: value.start_date,
            end_date: value.end_date,
            issue_date: value.issue_date,
            status: value.status,
            score: value.score,
            assignments: value.assignments,
            exam: value.exam,
            total_candidates: value.total_candidates,
            intern_image: value.intern_image,
            custom_description: value.custom_description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
