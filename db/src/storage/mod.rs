use async_trait::async_trait;
use credence_common::params::{PaginationParams, UpdateCertificateParams};
use thiserror::Error;

use crate::models::DbCertificate;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("A certificate with id '{0}' already exists")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait Storage: CertificateStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct CertificateFilter {
    /// Case-insensitive substring of the id or intern name.
    pub search: Option<String>,
}

/// Repository of issued certificates, kept in issue order.
#[async_trait]
pub trait CertificateStore {
    /// Append a certificate. Fails with [`StoreError::Conflict`] if the id is
    /// already taken.
    async fn add(&self, certificate: DbCertificate) -> Result<DbCertificate, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<DbCertificate>, StoreError>;

    async fn list(
        &self,
        filter: CertificateFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<DbCertificate>, StoreError>;

    /// Merge `patch` into an existing certificate.
    async fn update(
        &self,
        id: &str,
        patch: UpdateCertificateParams,
    ) -> Result<DbCertificate, StoreError>;

    /// Returns whether a certificate was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Flip between `Active` and `Revoked`.
    async fn toggle_status(&self, id: &str) -> Result<DbCertificate, StoreError>;
}
