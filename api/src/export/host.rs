use async_trait::async_trait;
use credence_common::views::SharePayload;
use thiserror::Error;

use crate::render::RenderedDocument;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} is not available here")]
    Unsupported(&'static str),

    #[error("the host refused the request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The environment a finished certificate is exported into.
#[async_trait]
pub trait ExportHost: Send + Sync {
    /// Open the host's print dialog for the document.
    async fn print(&self, document: &RenderedDocument) -> Result<(), HostError>;

    /// Whether [`ExportHost::share`] can succeed at all.
    fn supports_share(&self) -> bool;

    async fn share(&self, payload: &SharePayload) -> Result<(), HostError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), HostError>;

    async fn save_file(&self, file_name: &str, bytes: &[u8]) -> Result<(), HostError>;
}
