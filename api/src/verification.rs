//! Public certificate verification.
//!
//! A visitor arrives at `/verify?id=<id>`. The flow starts in
//! [`VerificationState::Loading`] and settles exactly once, into either
//! `Verified` or `Invalid`.

use std::time::Duration;

use credence_common::{
    params::VerifyParams,
    views::{Certificate, VerificationResult, VerifiedCertificate},
};
use credence_db::storage::{CertificateStore, StoreError};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    Loading,
    Verified(Certificate),
    Invalid { submitted_id: Option<String> },
}

impl VerificationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationState::Loading)
    }

    pub fn message(&self) -> String {
        match self {
            VerificationState::Loading => "Verifying certificate...".into(),
            VerificationState::Verified(cert) => format!(
                "This is an authentic certificate issued by {}.",
                cert.company_name
            ),
            VerificationState::Invalid {
                submitted_id: Some(id),
            } => format!("We couldn't verify the certificate with ID: {id}"),
            VerificationState::Invalid { submitted_id: None } => {
                "No certificate ID was provided for verification.".into()
            }
        }
    }

    pub fn to_result(&self, submitted_id: Option<&str>) -> VerificationResult {
        VerificationResult {
            verified: matches!(self, VerificationState::Verified(_)),
            submitted_id: submitted_id.map(str::to_string),
            message: self.message(),
            certificate: match self {
                VerificationState::Verified(cert) => Some(VerifiedCertificate::from(cert)),
                _ => None,
            },
        }
    }
}

#[derive(Debug)]
pub struct VerificationFlow {
    submitted_id: Option<String>,
    delay: Duration,
    state: VerificationState,
}

impl VerificationFlow {
    /// Start a flow from the query string. A missing or empty id settles
    /// immediately as `Invalid`. Any other id is looked up exactly as given.
    pub fn enter(params: VerifyParams, delay: Duration) -> Self {
        let submitted_id = params.id.filter(|id| !id.is_empty());
        let state = match submitted_id {
            Some(_) => VerificationState::Loading,
            None => VerificationState::Invalid { submitted_id: None },
        };

        Self {
            submitted_id,
            delay,
            state,
        }
    }

    pub fn submitted_id(&self) -> Option<&str> {
        self.submitted_id.as_deref()
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Look the submitted id up and settle. A flow that has already settled
    /// is returned unchanged without touching the store.
    #[instrument(skip(self, store), fields(id = ?self.submitted_id))]
    pub async fn resolve<S>(&mut self, store: &S) -> Result<&VerificationState, StoreError>
    where
        S: CertificateStore + Sync + ?Sized,
    {
        if self.state.is_terminal() {
            return Ok(&self.state);
        }

        let Some(id) = self.submitted_id.clone() else {
            self.state = VerificationState::Invalid { submitted_id: None };
            return Ok(&self.state);
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.state = match store.get(&id).await? {
            Some(cert) => VerificationState::Verified(cert.into()),
            None => VerificationState::Invalid {
                submitted_id: Some(id),
            },
        };
        debug!(verified = matches!(self.state, VerificationState::Verified(_)), "verification settled");

        Ok(&self.state)
    }

    pub fn into_result(self) -> VerificationResult {
        self.state.to_result(self.submitted_id.as_deref())
    }
}
