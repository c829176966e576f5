use async_trait::async_trait;
use chrono::Utc;
use credence_common::params::{PaginationParams, UpdateCertificateParams};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{
    models::DbCertificate,
    storage::{CertificateFilter, CertificateStore, StoreError, Storage},
};

/// Process-local certificate storage. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    certificates: RwLock<Vec<DbCertificate>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `certificates` already issued, in the given order.
    pub fn with_certificates(certificates: Vec<DbCertificate>) -> Self {
        Self {
            certificates: RwLock::new(certificates),
        }
    }

    pub async fn len(&self) -> usize {
        self.certificates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.certificates.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CertificateStore for MemoryStorage {
    #[instrument(skip(self, certificate), fields(id = %certificate.id))]
    async fn add(&self, certificate: DbCertificate) -> Result<DbCertificate, StoreError> {
        let mut certs = self.certificates.write().await;
        if certs.iter().any(|c| c.id == certificate.id) {
            return Err(StoreError::Conflict(certificate.id));
        }

        certs.push(certificate.clone());
        debug!(total = certs.len(), "certificate added");
        Ok(certificate)
    }

    async fn get(&self, id: &str) -> Result<Option<DbCertificate>, StoreError> {
        Ok(self
            .certificates
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list(
        &self,
        filter: CertificateFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<DbCertificate>, StoreError> {
        let certs = self.certificates.read().await;
        let limit = pagination
            .limit
            .map(|l| l as usize)
            .unwrap_or(usize::MAX);

        Ok(certs
            .iter()
            .filter(|c| match filter.search.as_deref() {
                Some(term) => c.matches(term),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, patch))]
    async fn update(
        &self,
        id: &str,
        patch: UpdateCertificateParams,
    ) -> Result<DbCertificate, StoreError> {
        let mut certs = self.certificates.write().await;
        let cert = certs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;

        cert.apply(patch, Utc::now());
        debug!("certificate updated");
        Ok(cert.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut certs = self.certificates.write().await;
        let before = certs.len();
        certs.retain(|c| c.id != id);

        let removed = certs.len() != before;
        debug!(removed, "certificate delete");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn toggle_status(&self, id: &str) -> Result<DbCertificate, StoreError> {
        let mut certs = self.certificates.write().await;
        let cert = certs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;

        cert.status = cert.status.toggled();
        cert.updated_at = Utc::now();
        debug!(status = %cert.status, "certificate status toggled");
        Ok(cert.clone())
    }
}

#[cfg(test)]
mod tests {
    use credence_common::views::CertificateStatus;

    use super::*;
    use crate::fixed_data::demo_certificates;

    fn seeded() -> MemoryStorage {
        MemoryStorage::with_certificates(demo_certificates())
    }

    #[tokio::test]
    async fn add_appends_and_returns_record() {
        let store = MemoryStorage::new();
        let cert = demo_certificates().remove(0);

        let added = store.add(cert.clone()).await.unwrap();

        assert_eq!(added, cert);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&cert.id).await.unwrap(), Some(cert));
    }

    #[tokio::test]
    async fn add_rejects_duplicate_ids() {
        let store = seeded();
        let dup = demo_certificates().remove(0);

        let err = store.add(dup).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(id) if id == "TECH-XYZ1234"));
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        assert_eq!(seeded().get("BOGUS").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_keeps_issue_order_and_filters() {
        let store = seeded();

        let all = store
            .list(CertificateFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            ["TECH-XYZ1234", "TECH-ABC5678", "TECH-DEF9012", "TECH-EJXZFAD"]
        );

        let found = store
            .list(
                CertificateFilter {
                    search: Some("JOHN".into()),
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|c| c.intern_name.as_str()).collect();
        assert_eq!(names, ["John Smith", "Emily Johnson"]);

        let limited = store
            .list(
                CertificateFilter::default(),
                PaginationParams { limit: Some(2) },
            )
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn update_merges_and_preserves_identity() {
        let store = seeded();
        store.toggle_status("TECH-ABC5678").await.unwrap();

        let updated = store
            .update(
                "TECH-ABC5678",
                UpdateCertificateParams {
                    intern_name: Some("Johnny Smith".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, "TECH-ABC5678");
        assert_eq!(updated.intern_name, "Johnny Smith");
        assert_eq!(updated.internship_program, "UI/UX Design");
        assert_eq!(updated.status, CertificateStatus::Revoked);
        assert_eq!(updated.issue_date, demo_certificates()[1].issue_date);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let err = seeded()
            .update("BOGUS", UpdateCertificateParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_then_lookup_is_not_found() {
        let store = seeded();

        assert!(store.delete("TECH-DEF9012").await.unwrap());
        assert_eq!(store.get("TECH-DEF9012").await.unwrap(), None);
        assert!(!store.delete("TECH-DEF9012").await.unwrap());
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn toggle_twice_restores_status() {
        let store = seeded();

        let once = store.toggle_status("TECH-XYZ1234").await.unwrap();
        assert_eq!(once.status, CertificateStatus::Revoked);

        let twice = store.toggle_status("TECH-XYZ1234").await.unwrap();
        assert_eq!(twice.status, CertificateStatus::Active);
    }

    #[tokio::test]
    async fn toggle_missing_is_not_found() {
        let err = seeded().toggle_status("BOGUS").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
