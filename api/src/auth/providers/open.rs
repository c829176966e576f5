use async_trait::async_trait;
use axum::http::request::Parts;
use credence_common::caller::Caller;

use crate::auth::{error::AuthError, provider::AuthProvider};

/// Treats every request as the admin. Installed only when no admin token is
/// configured.
pub struct OpenAccessProvider;

#[async_trait]
impl AuthProvider for OpenAccessProvider {
    async fn authenticate(&self, _parts: &Parts) -> Result<Caller, AuthError> {
        Ok(Caller::Admin)
    }

    fn scheme(&self) -> &'static str {
        "open"
    }
}
