use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use credence_api::{
    export::{DirectoryHost, ExportAdapter, html_file_name, pdf_file_name},
    render::{RenderAssets, TemplateVariant, render as render_certificate},
};
use credence_common::{form::CertificateForm, params::CreateCertificateParams, views::Certificate};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pdf,
    Html,
}

#[derive(Clone, Parser)]
pub struct RenderParams {
    /// Certificate JSON: an issued certificate, or a generator form
    /// submission to issue on the fly.
    #[clap(short, long)]
    pub input: PathBuf,

    #[clap(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    #[clap(short, long, value_enum, default_value_t = OutputFormat::Pdf)]
    pub format: OutputFormat,

    #[clap(long, value_enum, default_value_t = TemplateVariant::Classic)]
    pub variant: TemplateVariant,

    /// Origin that the verification link on the certificate points at.
    #[clap(
        long,
        env = "CREDENCE_API_PUBLIC_URL",
        default_value = "https://techinstance.com"
    )]
    pub public_url: String,

    #[clap(
        long,
        env = "CREDENCE_API_SIGNATORY_NAME",
        default_value = "Ajay Kumar Yadav"
    )]
    pub signatory_name: String,

    #[clap(
        long,
        env = "CREDENCE_API_SIGNATORY_POSITION",
        default_value = "Tech Instance Coordinator"
    )]
    pub signatory_position: String,
}

/// An issued certificate is tried first. A submission may only carry form
/// fields, so a certificate with a field missing is refused rather than
/// re-issued.
#[derive(Deserialize)]
#[serde(untagged)]
enum RenderInput {
    Issued(Certificate),
    Submission(CreateCertificateParams),
}

fn parse_input(bytes: &[u8], now: DateTime<Utc>) -> anyhow::Result<Certificate> {
    match serde_json::from_slice::<RenderInput>(bytes).context("input is neither an issued certificate nor a form submission")? {
        RenderInput::Issued(cert) => Ok(cert),
        RenderInput::Submission(params) => {
            debug!("input is a form submission, issuing it");
            CertificateForm::default()
                .build(params, now)
                .map_err(|e| anyhow::anyhow!("{}: {}", e.title(), e.description()))
        }
    }
}

pub async fn render(params: RenderParams) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&params.input)
        .await
        .with_context(|| format!("failed to read {}", params.input.display()))?;
    let cert = parse_input(&bytes, Utc::now())?;

    let assets = RenderAssets {
        signatory_name: params.signatory_name,
        signatory_position: params.signatory_position,
        verification_base: params.public_url.clone(),
        ..RenderAssets::default()
    };
    let doc = render_certificate(&cert, &assets, params.variant)?;

    let host = DirectoryHost::new(&params.output_dir);
    let adapter = ExportAdapter::new(&host, params.public_url);
    let (note, file_name) = match params.format {
        OutputFormat::Pdf => (adapter.download_pdf(Some(&doc)).await, pdf_file_name(&cert.id)),
        OutputFormat::Html => (adapter.download_html(&doc).await, html_file_name(&cert.id)),
    };

    if note.is_error() {
        bail!("{}: {}", note.title, note.description);
    }

    let path = host.dir().join(file_name);
    info!(id = %cert.id, path = %path.display(), "certificate rendered");
    println!("{}: {}", note.title, path.display());
    Ok(())
}
