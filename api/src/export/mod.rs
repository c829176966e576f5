//! Getting a rendered certificate out to the user.
//!
//! [`ExportAdapter`] runs the print, download, share and copy-link actions
//! against an [`ExportHost`] and reports each outcome as a [`Notification`].
//! A failed action leaves nothing behind on the host.

use credence_common::views::{Certificate, Notification, SharePayload};
use tracing::{info, instrument, warn};

use crate::render::{RenderedDocument, link};

pub mod capture;
pub mod directory;
pub mod host;

pub use capture::{CaptureHost, HostEffect};
pub use directory::DirectoryHost;
pub use host::{ExportHost, HostError};

/// `certificate-<id>.pdf`, with characters that can't appear in a file name
/// replaced by `_`.
pub fn pdf_file_name(certificate_id: &str) -> String {
    format!("certificate-{}.pdf", file_stem(certificate_id))
}

pub fn html_file_name(certificate_id: &str) -> String {
    format!("certificate-{}.html", file_stem(certificate_id))
}

fn file_stem(certificate_id: &str) -> String {
    certificate_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub struct ExportAdapter<'h, H: ExportHost + ?Sized> {
    host: &'h H,
    verification_base: String,
}

impl<'h, H: ExportHost + ?Sized> ExportAdapter<'h, H> {
    pub fn new(host: &'h H, verification_base: impl Into<String>) -> Self {
        Self {
            host,
            verification_base: verification_base.into(),
        }
    }

    pub fn verification_url(&self, certificate_id: &str) -> Result<String, url::ParseError> {
        link::verification_url(&self.verification_base, certificate_id).map(String::from)
    }

    pub fn share_payload(&self, cert: &Certificate) -> Result<SharePayload, url::ParseError> {
        Ok(SharePayload {
            title: format!("Internship Certificate - {}", cert.intern_name),
            text: format!(
                "{} completed the {} internship at {}. Verify this certificate:",
                cert.intern_name, cert.internship_program, cert.company_name
            ),
            url: self.verification_url(&cert.id)?,
        })
    }

    #[instrument(skip_all, fields(id = document.certificate_id()))]
    pub async fn print(&self, document: &RenderedDocument) -> Notification {
        match self.host.print(document).await {
            Ok(()) => Notification::success(
                "Print Ready",
                "The certificate has been sent to the print dialog.",
            ),
            Err(e) => {
                warn!(error = %e, "print failed");
                Notification::error("Print Failed", format!("Could not print the certificate: {e}"))
            }
        }
    }

    /// Build the PDF and save it as `certificate-<id>.pdf`.
    #[instrument(skip_all, fields(id = document.map(|d| d.certificate_id())))]
    pub async fn download_pdf(&self, document: Option<&RenderedDocument>) -> Notification {
        let Some(document) = document else {
            return Notification::error(
                "Download Failed",
                "There is no certificate preview to download yet.",
            );
        };

        let bytes = match document.to_pdf() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "pdf generation failed");
                return Notification::error(
                    "Download Failed",
                    format!("Could not generate the PDF: {e}"),
                );
            }
        };

        let file_name = pdf_file_name(document.certificate_id());
        match self.host.save_file(&file_name, &bytes).await {
            Ok(()) => {
                info!(file_name, "certificate downloaded");
                Notification::success(
                    "Certificate Downloaded",
                    "The certificate has been saved to your device.",
                )
            }
            Err(e) => {
                warn!(error = %e, "saving pdf failed");
                Notification::error("Download Failed", format!("Could not save {file_name}: {e}"))
            }
        }
    }

    /// Save the certificate page itself as `certificate-<id>.html`.
    #[instrument(skip_all, fields(id = document.certificate_id()))]
    pub async fn download_html(&self, document: &RenderedDocument) -> Notification {
        let file_name = html_file_name(document.certificate_id());
        match self.host.save_file(&file_name, document.html.as_bytes()).await {
            Ok(()) => Notification::success(
                "Certificate Downloaded",
                "The certificate has been saved to your device.",
            ),
            Err(e) => {
                warn!(error = %e, "saving html failed");
                Notification::error("Download Failed", format!("Could not save {file_name}: {e}"))
            }
        }
    }

    /// Share through the host's share sheet, or tell the user to copy the
    /// link when there isn't one.
    #[instrument(skip_all, fields(id = %cert.id))]
    pub async fn share(&self, cert: &Certificate) -> Notification {
        let payload = match self.share_payload(cert) {
            Ok(payload) => payload,
            Err(e) => {
                return Notification::error(
                    "Share Failed",
                    format!("Could not build the verification link: {e}"),
                );
            }
        };

        if !self.host.supports_share() {
            return Notification::success(
                "Sharing Not Supported",
                format!("Copy this link to share the certificate: {}", payload.url),
            );
        }

        match self.host.share(&payload).await {
            Ok(()) => Notification::success(
                "Certificate Shared",
                "The verification link has been shared.",
            ),
            Err(e) => {
                warn!(error = %e, "share failed");
                Notification::error("Share Failed", format!("Could not share the certificate: {e}"))
            }
        }
    }

    #[instrument(skip_all, fields(id = %cert.id))]
    pub async fn copy_verification_link(&self, cert: &Certificate) -> Notification {
        let url = match self.verification_url(&cert.id) {
            Ok(url) => url,
            Err(e) => {
                return Notification::error(
                    "Copy Failed",
                    format!("Could not build the verification link: {e}"),
                );
            }
        };

        match self.host.write_clipboard(&url).await {
            Ok(()) => Notification::success(
                "Link Copied",
                "The verification link has been copied to your clipboard.",
            ),
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                Notification::error(
                    "Copy Failed",
                    format!("Could not copy the verification link: {e}"),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::render::{RenderAssets, TemplateVariant, render, tests::jane_doe};

    const BASE: &str = "https://techinstance.com";

    fn document() -> RenderedDocument {
        render(&jane_doe(), &RenderAssets::default(), TemplateVariant::Classic).unwrap()
    }

    /// A host on which every action fails.
    struct BrokenHost;

    #[async_trait]
    impl ExportHost for BrokenHost {
        async fn print(&self, _document: &RenderedDocument) -> Result<(), HostError> {
            Err(HostError::Rejected("printer offline".into()))
        }

        fn supports_share(&self) -> bool {
            true
        }

        async fn share(&self, _payload: &SharePayload) -> Result<(), HostError> {
            Err(HostError::Rejected("share cancelled".into()))
        }

        async fn write_clipboard(&self, _text: &str) -> Result<(), HostError> {
            Err(HostError::Rejected("permission denied".into()))
        }

        async fn save_file(&self, _file_name: &str, _bytes: &[u8]) -> Result<(), HostError> {
            Err(HostError::Rejected("disk full".into()))
        }
    }

    #[test]
    fn file_names_follow_certificate_id() {
        assert_eq!(pdf_file_name("TECH-XYZ1234"), "certificate-TECH-XYZ1234.pdf");
        assert_eq!(pdf_file_name("A/B 1"), "certificate-A_B_1.pdf");
        assert_eq!(html_file_name("TECH-XYZ1234"), "certificate-TECH-XYZ1234.html");
    }

    #[tokio::test]
    async fn download_saves_pdf_under_certificate_name() {
        let host = CaptureHost::new(false);
        let adapter = ExportAdapter::new(&host, BASE);
        let doc = document();

        let note = adapter.download_pdf(Some(&doc)).await;

        assert!(!note.is_error());
        assert_eq!(note.title, "Certificate Downloaded");
        let effects = host.take_effects();
        let [HostEffect::Saved { file_name, bytes }] = effects.as_slice() else {
            panic!("expected one saved file, got {effects:?}");
        };
        assert_eq!(file_name, "certificate-TECH-XYZ1234.pdf");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn download_without_document_saves_nothing() {
        let host = CaptureHost::new(false);
        let note = ExportAdapter::new(&host, BASE).download_pdf(None).await;

        assert!(note.is_error());
        assert!(host.take_effects().is_empty());
    }

    #[tokio::test]
    async fn download_refuses_names_the_pdf_cannot_spell() {
        let mut cert = jane_doe();
        cert.intern_name = "Łukasz Nguyễn".into();
        let doc = render(&cert, &RenderAssets::default(), TemplateVariant::Classic).unwrap();

        let host = CaptureHost::new(false);
        let note = ExportAdapter::new(&host, BASE).download_pdf(Some(&doc)).await;

        assert!(note.is_error());
        assert_eq!(note.title, "Download Failed");
        assert!(note.description.contains("'Ł'"));
        assert!(host.take_effects().is_empty());
    }

    #[tokio::test]
    async fn print_hands_document_to_host() {
        let host = CaptureHost::new(false);
        let note = ExportAdapter::new(&host, BASE).print(&document()).await;

        assert!(!note.is_error());
        match host.take_effects().as_slice() {
            [HostEffect::Printed { certificate_id, html }] => {
                assert_eq!(certificate_id, "TECH-XYZ1234");
                assert!(html.contains("window.print()"));
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[tokio::test]
    async fn share_uses_native_sheet_when_supported() {
        let host = CaptureHost::new(true);
        let note = ExportAdapter::new(&host, BASE).share(&jane_doe()).await;

        assert_eq!(note.title, "Certificate Shared");
        assert_eq!(
            host.take_effects(),
            vec![HostEffect::Shared(SharePayload {
                title: "Internship Certificate - Jane Doe".into(),
                text: "Jane Doe completed the Full Stack Development internship at Tech Instance. Verify this certificate:".into(),
                url: "https://techinstance.com/verify?id=TECH-XYZ1234".into(),
            })]
        );
    }

    #[tokio::test]
    async fn share_falls_back_to_manual_copy() {
        let host = CaptureHost::new(false);
        let note = ExportAdapter::new(&host, BASE).share(&jane_doe()).await;

        assert!(!note.is_error());
        assert_eq!(note.title, "Sharing Not Supported");
        assert!(note
            .description
            .ends_with("https://techinstance.com/verify?id=TECH-XYZ1234"));
        assert!(host.take_effects().is_empty());
    }

    #[tokio::test]
    async fn copy_link_writes_clipboard() {
        let host = CaptureHost::new(false);
        let note = ExportAdapter::new(&host, BASE)
            .copy_verification_link(&jane_doe())
            .await;

        assert_eq!(note.title, "Link Copied");
        assert_eq!(
            host.take_effects(),
            vec![HostEffect::Clipboard(
                "https://techinstance.com/verify?id=TECH-XYZ1234".into()
            )]
        );
    }

    #[tokio::test]
    async fn host_failures_become_destructive_notifications() {
        let adapter = ExportAdapter::new(&BrokenHost, BASE);
        let doc = document();

        let notes = [
            adapter.print(&doc).await,
            adapter.download_pdf(Some(&doc)).await,
            adapter.share(&jane_doe()).await,
            adapter.copy_verification_link(&jane_doe()).await,
        ];

        for note in notes {
            assert!(note.is_error(), "{note:?}");
        }
    }

    #[tokio::test]
    async fn directory_host_writes_files() {
        let dir = std::env::temp_dir().join(format!("credence-export-{}", std::process::id()));
        let host = DirectoryHost::new(&dir);
        let adapter = ExportAdapter::new(&host, BASE);

        let note = adapter.download_pdf(Some(&document())).await;
        assert!(!note.is_error(), "{note:?}");

        let saved = tokio::fs::read(dir.join("certificate-TECH-XYZ1234.pdf"))
            .await
            .unwrap();
        assert!(saved.starts_with(b"%PDF-"));

        assert!(adapter.print(&document()).await.is_error());
        assert!(adapter.copy_verification_link(&jane_doe()).await.is_error());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
