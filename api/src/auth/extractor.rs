use std::future::Future;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use credence_common::caller::{Caller, CallerError};

use crate::{context::ApiContext, error::ApiError};

/// Extractor that identifies the caller.
///
/// Credentials that are present but wrong are rejected with 401 here. A
/// request without credentials yields [`Caller::Anonymous`], which the
/// handler's permission check turns into a 401:
///
/// ```rust,ignore
/// pub async fn delete_certificate(
///     Auth(caller): Auth,
///     Path(id): Path<String>,
/// ) -> Result<StatusCode, ApiError> {
///     caller.require(Permission::CertificatesWrite)?;
///     // ... delete certificate
/// }
/// ```
pub struct Auth(pub Caller);

impl FromRequestParts<ApiContext> for Auth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &ApiContext,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth_manager = Arc::clone(&state.auth_manager);
        async move {
            let caller = auth_manager.authenticate(parts).await.map_err(|e| {
                ApiError::CallerError(CallerError::unauthorized(Some(e.to_string())))
            })?;
            Ok(Auth(caller))
        }
    }
}
