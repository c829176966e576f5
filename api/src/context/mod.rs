use std::sync::Arc;

use credence_common::form::CertificateForm;
use credence_db::storage::Storage;
use tracing::warn;

use crate::{
    auth::{AdminTokenProvider, AuthManager, OpenAccessProvider},
    config::CredenceApiConfig,
    render::RenderAssets,
};

#[derive(Clone)]
pub struct ApiContext {
    pub config: CredenceApiConfig,
    pub db: Arc<dyn Storage>,
    pub auth_manager: Arc<AuthManager>,
    pub form: CertificateForm,
    pub assets: Arc<RenderAssets>,
}

impl ApiContext {
    /// # Errors
    ///
    /// Fails if the configured render assets can't be loaded.
    pub fn new(config: CredenceApiConfig, db: Arc<dyn Storage>) -> anyhow::Result<Self> {
        let auth_manager = match config.admin_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => AuthManager::new().with_provider(AdminTokenProvider::new(token)),
            None => {
                warn!("No admin token configured, admin routes are open to anyone");
                AuthManager::new().with_provider(OpenAccessProvider)
            }
        };

        let form = CertificateForm::new(config.id_prefix.clone(), config.company_name.clone());
        let assets = config.render_assets()?;

        Ok(Self {
            config,
            db,
            auth_manager: Arc::new(auth_manager),
            form,
            assets: Arc::new(assets),
        })
    }
}
