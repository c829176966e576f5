use std::path::{Path, PathBuf};

use async_trait::async_trait;
use credence_common::views::SharePayload;
use tracing::info;

use super::host::{ExportHost, HostError};
use crate::render::RenderedDocument;

/// Saves exported files into a directory. There is no printer, share sheet
/// or clipboard.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    dir: PathBuf,
}

impl DirectoryHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExportHost for DirectoryHost {
    async fn print(&self, _document: &RenderedDocument) -> Result<(), HostError> {
        Err(HostError::Unsupported("printing"))
    }

    fn supports_share(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<(), HostError> {
        Err(HostError::Unsupported("sharing"))
    }

    async fn write_clipboard(&self, _text: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("the clipboard"))
    }

    async fn save_file(&self, file_name: &str, bytes: &[u8]) -> Result<(), HostError> {
        // Only a bare file name may be written, never a path.
        if Path::new(file_name).file_name().and_then(|n| n.to_str()) != Some(file_name) {
            return Err(HostError::Rejected(format!("invalid file name '{file_name}'")));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "file saved");
        Ok(())
    }
}
