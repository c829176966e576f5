use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::views::ImageRef;

/// Body of the certificate generator form.
///
/// Only `intern_name` and `internship_program` are required; everything else
/// falls back to the form defaults. Fields the form does not have, such as
/// `status` or `issue_date`, are rejected.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCertificateParams {
    /// Explicit certificate id. Generated when omitted.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub intern_name: String,

    #[serde(default)]
    pub internship_program: String,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub score: Option<String>,

    #[serde(default)]
    pub assignments: Option<String>,

    #[serde(default)]
    pub exam: Option<String>,

    #[serde(default)]
    pub total_candidates: Option<String>,

    #[serde(default)]
    pub intern_image: ImageRef,

    #[serde(default)]
    pub custom_description: Option<String>,
}

/// Partial update applied by the edit flow.
///
/// `id`, `issue_date` and `status` cannot be changed through this type and
/// unknown fields are rejected. Optional fields accept `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCertificateParams {
    #[serde(default)]
    pub intern_name: Option<String>,

    #[serde(default)]
    pub internship_program: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub score: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub assignments: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub exam: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub total_candidates: Option<Option<String>>,

    #[serde(default)]
    pub intern_image: Option<ImageRef>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub custom_description: Option<Option<String>>,
}

/// Query for the admin certificate list.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListCertificatesParams {
    /// Case-insensitive match against the certificate id or intern name.
    pub search: Option<String>,

    /// The maximum number of results to return.
    pub limit: Option<u64>,
}

/// Query carried by a verification link, `/verify?id=<id>`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct VerifyParams {
    pub id: Option<String>,
}
