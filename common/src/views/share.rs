use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Notification;

/// What gets handed to a native share sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShareResponse {
    pub notification: Notification,

    /// Present when the certificate was shared; absent when the caller has
    /// to copy the link by hand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<SharePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerificationLinkResponse {
    pub url: String,
    pub notification: Notification,
}
