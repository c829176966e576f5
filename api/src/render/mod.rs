//! Certificate rendering.
//!
//! A certificate and the issuer's [`RenderAssets`] are first reduced to a
//! [`CertificateLayout`]: every string that appears on the page, already
//! formatted. The HTML and PDF back ends only place that layout on a page,
//! styled by the [`Theme`] of the chosen [`TemplateVariant`].

use chrono::NaiveDate;
use credence_common::views::{Certificate, CertificateStatus, ImageRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

pub mod html;
pub mod link;
pub mod pdf;

pub const HEADING: &str = "INTERNSHIP CERTIFICATE";
pub const AWARDED_TO: &str = "This certificate is awarded to";
pub const COMPLETION_LINE: &str = "for successfully completing the course";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid verification base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("failed to write document: {0}")]
    Write(#[from] std::fmt::Error),

    #[error("'{0}' cannot be written with the PDF's built-in fonts")]
    UnsupportedCharacter(char),
}

/// Visual theme of a certificate. All variants share one layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    #[default]
    Classic,
    Modern,
    Minimal,
}

impl TemplateVariant {
    pub fn theme(self) -> Theme {
        match self {
            TemplateVariant::Classic => Theme {
                primary: Rgb(11, 61, 145),
                accent: Rgb(21, 101, 192),
                muted: Rgb(75, 85, 99),
                paper: Rgb(239, 246, 255),
                panel: Rgb(219, 234, 254),
                font_family: "Georgia, 'Times New Roman', serif",
                ornate: true,
            },
            TemplateVariant::Modern => Theme {
                primary: Rgb(49, 46, 129),
                accent: Rgb(124, 58, 237),
                muted: Rgb(71, 85, 105),
                paper: Rgb(248, 250, 252),
                panel: Rgb(237, 233, 254),
                font_family: "'Helvetica Neue', Arial, sans-serif",
                ornate: false,
            },
            TemplateVariant::Minimal => Theme {
                primary: Rgb(17, 24, 39),
                accent: Rgb(55, 65, 81),
                muted: Rgb(107, 114, 128),
                paper: Rgb(255, 255, 255),
                panel: Rgb(243, 244, 246),
                font_family: "'Helvetica Neue', Arial, sans-serif",
                ornate: false,
            },
        }
    }
}

/// Query string selecting a template variant.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VariantParams {
    #[serde(default)]
    pub variant: TemplateVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Components scaled to `0.0..=1.0`, as PDF colour operators expect.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Rgb,
    pub accent: Rgb,
    pub muted: Rgb,
    pub paper: Rgb,
    pub panel: Rgb,
    pub font_family: &'static str,
    /// Double border instead of a plain top bar.
    pub ornate: bool,
}

/// Issuer-wide inputs to rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderAssets {
    pub company_logo: ImageRef,
    pub signature: ImageRef,
    pub signatory_name: String,
    pub signatory_position: String,
    /// Origin that verification links point at.
    pub verification_base: String,
    pub site_label: String,
}

impl Default for RenderAssets {
    fn default() -> Self {
        Self {
            company_logo: ImageRef::Absent,
            signature: ImageRef::Absent,
            signatory_name: "Ajay Kumar Yadav".into(),
            signatory_position: "Tech Instance Coordinator".into(),
            verification_base: "https://techinstance.com".into(),
            site_label: "WWW.TECHINSTANCE.COM".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// Everything printed on a certificate, formatted and in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLayout {
    pub certificate_id: String,
    pub heading: &'static str,
    pub awarded_to: &'static str,
    /// Intern name, upper-cased.
    pub recipient: String,
    pub completion_line: &'static str,
    pub program: String,
    pub company_name: String,
    pub description: Option<String>,
    /// Only the performance figures that were filled in.
    pub metrics: Vec<Metric>,
    pub date_range: String,
    /// Duration wrapped in parentheses.
    pub duration: String,
    pub signatory_name: String,
    pub signatory_position: String,
    pub signature: ImageRef,
    pub logo: ImageRef,
    /// Shown in place of a missing logo.
    pub logo_initials: String,
    pub intern_image: ImageRef,
    pub footer_uid: String,
    /// Encoded into the QR code.
    pub qr_payload: String,
    pub site_label: String,
    pub status: CertificateStatus,
}

/// Format a date the way certificates print it, e.g. `March 15, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Images are only ever embedded from data URLs.
fn embeddable(image: &ImageRef) -> ImageRef {
    match image.data_url() {
        Some(url) if url.starts_with("data:image/") => image.clone(),
        _ => ImageRef::Absent,
    }
}

/// Reduce a certificate to its printed layout.
///
/// # Errors
///
/// Fails only if the verification base URL in `assets` is not a URL.
pub fn layout(cert: &Certificate, assets: &RenderAssets) -> Result<CertificateLayout, RenderError> {
    let metrics = [
        ("Overall Score", &cert.score),
        ("Assignments", &cert.assignments),
        ("Final Examination", &cert.exam),
        ("Batch Size", &cert.total_candidates),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Metric {
                label,
                value: v.to_string(),
            })
    })
    .collect();

    let qr_payload = link::verification_url(&assets.verification_base, &cert.id)?.to_string();

    Ok(CertificateLayout {
        certificate_id: cert.id.clone(),
        heading: HEADING,
        awarded_to: AWARDED_TO,
        recipient: cert.intern_name.to_uppercase(),
        completion_line: COMPLETION_LINE,
        program: cert.internship_program.clone(),
        company_name: cert.company_name.clone(),
        description: cert
            .custom_description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        metrics,
        date_range: format!(
            "{} - {}",
            format_date(cert.start_date),
            format_date(cert.end_date)
        ),
        duration: format!("({})", cert.duration),
        signatory_name: assets.signatory_name.clone(),
        signatory_position: assets.signatory_position.clone(),
        signature: embeddable(&assets.signature),
        logo: embeddable(&assets.company_logo),
        logo_initials: initials(&cert.company_name),
        intern_image: embeddable(&cert.intern_image),
        footer_uid: format!("UID: {}", cert.id),
        qr_payload,
        site_label: assets.site_label.clone(),
        status: cert.status,
    })
}

/// A certificate rendered for one variant, ready to hand to an export host.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub variant: TemplateVariant,
    pub layout: CertificateLayout,
    pub html: String,
}

impl RenderedDocument {
    pub fn certificate_id(&self) -> &str {
        &self.layout.certificate_id
    }

    /// Lay the certificate out as a single-page PDF.
    pub fn to_pdf(&self) -> Result<Vec<u8>, RenderError> {
        pdf::render(&self.layout, self.variant.theme())
    }
}

/// Render a certificate to a document in the given variant.
pub fn render(
    cert: &Certificate,
    assets: &RenderAssets,
    variant: TemplateVariant,
) -> Result<RenderedDocument, RenderError> {
    let layout = layout(cert, assets)?;
    let html = html::certificate(&layout, variant.theme())?;

    Ok(RenderedDocument {
        variant,
        layout,
        html,
    })
}
