use std::sync::Mutex;

use async_trait::async_trait;
use credence_common::views::SharePayload;

use super::host::{ExportHost, HostError};
use crate::render::{RenderedDocument, html};

/// Something a [`CaptureHost`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    Printed { certificate_id: String, html: String },
    Shared(SharePayload),
    Clipboard(String),
    Saved { file_name: String, bytes: Vec<u8> },
}

/// Records effects instead of performing them, so a caller can turn them
/// into a response afterwards.
#[derive(Debug, Default)]
pub struct CaptureHost {
    share_supported: bool,
    effects: Mutex<Vec<HostEffect>>,
}

impl CaptureHost {
    pub fn new(share_supported: bool) -> Self {
        Self {
            share_supported,
            effects: Mutex::default(),
        }
    }

    fn record(&self, effect: HostEffect) -> Result<(), HostError> {
        self.effects
            .lock()
            .map_err(|_| HostError::Rejected("capture host poisoned".into()))?
            .push(effect);
        Ok(())
    }

    /// Everything recorded so far, oldest first. Clears the record.
    pub fn take_effects(&self) -> Vec<HostEffect> {
        match self.effects.lock() {
            Ok(mut effects) => std::mem::take(&mut *effects),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait]
impl ExportHost for CaptureHost {
    async fn print(&self, document: &RenderedDocument) -> Result<(), HostError> {
        self.record(HostEffect::Printed {
            certificate_id: document.certificate_id().to_string(),
            html: html::print_page(document),
        })
    }

    fn supports_share(&self) -> bool {
        self.share_supported
    }

    async fn share(&self, payload: &SharePayload) -> Result<(), HostError> {
        if !self.share_supported {
            return Err(HostError::Unsupported("sharing"));
        }
        self.record(HostEffect::Shared(payload.clone()))
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        self.record(HostEffect::Clipboard(text.to_string()))
    }

    async fn save_file(&self, file_name: &str, bytes: &[u8]) -> Result<(), HostError> {
        self.record(HostEffect::Saved {
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}
