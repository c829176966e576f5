use axum::http::request::Parts;
use credence_common::caller::Caller;
use tracing::{debug, instrument, trace};

use super::{error::AuthError, provider::AuthProvider};

/// Coordinates authentication providers in priority order.
///
/// Each registered provider is asked in turn. A provider that finds no
/// credentials of its kind returns `MissingCredentials` and the next one is
/// tried; any other error stops the search. When no provider finds
/// credentials the caller is [`Caller::Anonymous`].
///
/// ```rust,ignore
/// let auth_manager = AuthManager::new()
///     .with_provider(AdminTokenProvider::new("s3cret"));
///
/// let caller = auth_manager.authenticate(&request_parts).await?;
/// ```
pub struct AuthManager {
    providers: Vec<Box<dyn AuthProvider>>,
}

impl AuthManager {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_provider<P: AuthProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Try each provider in order until one succeeds
    #[instrument(skip_all)]
    pub async fn authenticate(&self, parts: &Parts) -> Result<Caller, AuthError> {
        for provider in &self.providers {
            trace!(scheme = provider.scheme(), "Trying auth provider");

            match provider.authenticate(parts).await {
                Ok(caller) => {
                    debug!(scheme = provider.scheme(), "Auth succeeded");
                    return Ok(caller);
                }
                Err(AuthError::MissingCredentials) => {
                    trace!(scheme = provider.scheme(), "No credentials for this scheme");
                    continue;
                }
                Err(e) => {
                    debug!(scheme = provider.scheme(), error = %e, "Auth failed");
                    return Err(e);
                }
            }
        }

        debug!("No credentials presented");
        Ok(Caller::Anonymous)
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}
