//! Bearer-token authentication for the admin console.
//!
//! The console has a single operator. Requests prove they come from that
//! operator by sending `Authorization: Bearer <token>` with the token the
//! server was started with (`CREDENCE_API_ADMIN_TOKEN`).

use async_trait::async_trait;
use axum::http::{header, request::Parts};
use credence_common::caller::Caller;
use tracing::instrument;

use crate::auth::{error::AuthError, provider::AuthProvider};

const BEARER_PREFIX: &str = "Bearer ";

pub struct AdminTokenProvider {
    token: String,
}

impl AdminTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for AdminTokenProvider {
    #[instrument(skip_all)]
    async fn authenticate(&self, parts: &Parts) -> Result<Caller, AuthError> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Err(AuthError::MissingCredentials);
        };

        let presented = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::MalformedHeader)?;

        if constant_time_eq(presented.trim().as_bytes(), self.token.as_bytes()) {
            Ok(Caller::Admin)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn scheme(&self) -> &'static str {
        "admin_token"
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn accepts_matching_token() {
        let provider = AdminTokenProvider::new("s3cret");
        let caller = provider
            .authenticate(&parts(Some("Bearer s3cret")))
            .await
            .unwrap();
        assert_eq!(caller, Caller::Admin);
    }

    #[tokio::test]
    async fn rejects_other_tokens_and_schemes() {
        let provider = AdminTokenProvider::new("s3cret");

        assert!(matches!(
            provider.authenticate(&parts(Some("Bearer s3cre"))).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            provider.authenticate(&parts(Some("Basic czNjcmV0"))).await,
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            provider.authenticate(&parts(None)).await,
            Err(AuthError::MissingCredentials)
        ));
    }
}
