use std::fmt::Write;

use credence_common::views::{CertificateStatus, ImageRef};

use super::{CertificateLayout, RenderError, RenderedDocument, Theme, format_date};
use crate::verification::VerificationState;

const PRINT_TRIGGER: &str =
    "<script>window.addEventListener('load', function () { window.print(); });</script>";

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn img(out: &mut String, image: &ImageRef, class: &str, alt: &str) -> Result<bool, RenderError> {
    match image.data_url() {
        Some(src) => {
            write!(
                out,
                r#"<img class="{class}" src="{}" alt="{}">"#,
                escape(src),
                escape(alt)
            )?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn style(theme: Theme) -> String {
    let border = if theme.ornate {
        format!(
            "border: 6px double {}; outline: 1px solid {}; outline-offset: -14px;",
            theme.primary.hex(),
            theme.accent.hex()
        )
    } else {
        format!("border-top: 8px solid {};", theme.accent.hex())
    };

    format!(
        r#"
body {{ margin: 0; background: #e5e7eb; font-family: {font}; }}
.certificate {{ position: relative; width: 297mm; min-height: 210mm; margin: 0 auto; box-sizing: border-box; background: {paper}; {border} display: flex; flex-direction: column; }}
.header {{ display: flex; justify-content: space-between; align-items: center; padding: 24px 40px 8px; border-bottom: 1px solid #e5e7eb; }}
.logo, .logo-initials {{ width: 96px; height: 96px; object-fit: contain; }}
.logo-initials {{ border-radius: 50%; background: {primary}; color: #fff; display: flex; align-items: center; justify-content: center; font-size: 36px; font-weight: bold; }}
h1 {{ color: {primary}; font-size: 34px; letter-spacing: 2px; margin: 0; }}
.content {{ flex: 1; text-align: center; padding: 16px 40px; }}
.lead {{ font-style: italic; color: {muted}; font-size: 20px; margin: 8px 0; }}
.recipient {{ color: {primary}; font-size: 38px; margin: 12px 0; }}
.program {{ color: {accent}; font-size: 30px; margin: 12px 0; }}
.description {{ color: {muted}; font-size: 17px; max-width: 720px; margin: 0 auto 16px; }}
.intern-photo {{ position: absolute; right: 40px; top: 190px; width: 128px; height: 160px; object-fit: cover; border: 1px solid #d1d5db; }}
.metrics {{ display: grid; grid-template-columns: repeat(2, minmax(0, 200px)); gap: 12px; justify-content: center; margin: 16px 0; }}
.metric {{ background: {panel}; border-radius: 8px; padding: 10px; }}
.metric .label {{ color: {muted}; font-size: 13px; }}
.metric .value {{ color: {primary}; font-size: 18px; font-weight: 600; }}
.details {{ display: flex; justify-content: space-between; align-items: flex-end; padding: 0 40px 16px; color: {muted}; font-size: 17px; }}
.signatory {{ text-align: center; }}
.signature {{ height: 64px; max-width: 160px; object-fit: contain; }}
.signature-line {{ height: 64px; width: 160px; border-bottom: 1px solid #9ca3af; margin: 0 auto 4px; }}
.signatory .name {{ font-weight: bold; color: #1f2937; }}
.footer {{ display: flex; justify-content: space-between; align-items: center; padding: 12px 40px; background: {primary}; color: #fff; }}
.qr {{ background: #fff; color: {primary}; padding: 8px; border-radius: 6px; font-size: 11px; max-width: 220px; word-break: break-all; }}
.qr a {{ color: inherit; }}
.revoked {{ position: absolute; top: 40%; left: 0; right: 0; text-align: center; font-size: 72px; color: rgba(185, 28, 28, 0.25); transform: rotate(-12deg); pointer-events: none; }}
@media print {{ body {{ background: none; }} @page {{ size: A4 landscape; margin: 0; }} }}
"#,
        font = theme.font_family,
        paper = theme.paper.hex(),
        border = border,
        primary = theme.primary.hex(),
        accent = theme.accent.hex(),
        muted = theme.muted.hex(),
        panel = theme.panel.hex(),
    )
}

/// A standalone HTML page showing the certificate.
pub fn certificate(layout: &CertificateLayout, theme: Theme) -> Result<String, RenderError> {
    let mut out = String::new();

    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{heading} - {id}</title>
<style>{style}</style>
</head>
<body>
<div class="certificate" data-certificate-id="{id}">
<div class="header">
"#,
        heading = layout.heading,
        id = escape(&layout.certificate_id),
        style = style(theme),
    )?;

    if !img(&mut out, &layout.logo, "logo", "Company logo")? {
        write!(
            out,
            r#"<div class="logo-initials">{}</div>"#,
            escape(&layout.logo_initials)
        )?;
    }
    writeln!(
        out,
        r#"<h1>{}</h1><div class="logo"></div></div>"#,
        layout.heading
    )?;

    writeln!(out, r#"<div class="content">"#)?;
    writeln!(out, r#"<p class="lead">{}</p>"#, layout.awarded_to)?;
    writeln!(out, r#"<h2 class="recipient">{}</h2>"#, escape(&layout.recipient))?;
    writeln!(out, r#"<p class="lead">{}</p>"#, layout.completion_line)?;
    writeln!(out, r#"<h3 class="program">{}</h3>"#, escape(&layout.program))?;

    img(&mut out, &layout.intern_image, "intern-photo", "Intern photo")?;

    if let Some(description) = &layout.description {
        writeln!(out, r#"<p class="description">{}</p>"#, escape(description))?;
    }

    if !layout.metrics.is_empty() {
        out.push_str(r#"<div class="metrics">"#);
        for metric in &layout.metrics {
            write!(
                out,
                r#"<div class="metric"><div class="label">{}</div><div class="value">{}</div></div>"#,
                metric.label,
                escape(&metric.value)
            )?;
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");

    write!(
        out,
        r#"<div class="details"><div><p>{}</p><p>{}</p></div><div class="signatory">"#,
        escape(&layout.date_range),
        escape(&layout.duration)
    )?;
    if !img(&mut out, &layout.signature, "signature", "Signature")? {
        out.push_str(r#"<div class="signature-line"></div>"#);
    }
    writeln!(
        out,
        r#"<div class="name">{}</div><div>{}</div></div></div>"#,
        escape(&layout.signatory_name),
        escape(&layout.signatory_position)
    )?;

    let qr = escape(&layout.qr_payload);
    writeln!(
        out,
        r#"<div class="footer"><strong>{uid}</strong><div class="qr" data-qr-payload="{qr}"><a href="{qr}">{qr}</a></div><strong>{site}</strong></div>"#,
        uid = escape(&layout.footer_uid),
        site = escape(&layout.site_label),
    )?;

    if layout.status == CertificateStatus::Revoked {
        writeln!(out, r#"<div class="revoked">REVOKED</div>"#)?;
    }

    out.push_str("</div>\n</body>\n</html>\n");
    Ok(out)
}

/// The certificate page with a trigger that opens the print dialog on load.
pub fn print_page(document: &RenderedDocument) -> String {
    match document.html.rfind("</body>") {
        Some(at) => {
            let mut page = String::with_capacity(document.html.len() + PRINT_TRIGGER.len());
            page.push_str(&document.html[..at]);
            page.push_str(PRINT_TRIGGER);
            page.push('\n');
            page.push_str(&document.html[at..]);
            page
        }
        None => format!("{}{}", document.html, PRINT_TRIGGER),
    }
}

/// The public page behind `/verify?id=`.
pub fn verification_page(state: &VerificationState) -> Result<String, RenderError> {
    let theme = super::TemplateVariant::Classic.theme();
    let mut out = String::new();

    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Certificate Verification</title>
<style>
body {{ margin: 0; background: {paper}; font-family: {font}; color: #1f2937; }}
main {{ max-width: 640px; margin: 48px auto; padding: 32px; background: #fff; border-radius: 12px; box-shadow: 0 4px 16px rgba(0, 0, 0, 0.08); }}
h1 {{ color: {primary}; }}
.verified {{ color: #15803d; }}
.invalid {{ color: #b91c1c; }}
dl {{ display: grid; grid-template-columns: max-content 1fr; gap: 8px 24px; }}
dt {{ color: #6b7280; }}
</style>
</head>
<body>
<main>
<h1>Certificate Verification</h1>
"#,
        paper = theme.paper.hex(),
        font = theme.font_family,
        primary = theme.primary.hex(),
    )?;

    match state {
        VerificationState::Loading => {
            writeln!(out, r#"<p class="loading">{}</p>"#, escape(&state.message()))?;
        }
        VerificationState::Verified(cert) => {
            writeln!(
                out,
                r#"<h2 class="verified">Certificate Verified</h2><p>{}</p>"#,
                escape(&state.message())
            )?;
            write!(
                out,
                r#"<dl>
<dt>Certificate ID</dt><dd>{id}</dd>
<dt>Intern Name</dt><dd>{name}</dd>
<dt>Internship Program</dt><dd>{program}</dd>
<dt>Company</dt><dd>{company}</dd>
<dt>Duration</dt><dd>{start} - {end} ({duration})</dd>
<dt>Issue Date</dt><dd>{issued}</dd>
<dt>Status</dt><dd class="status-{status_class}">{status}</dd>
</dl>
"#,
                id = escape(&cert.id),
                name = escape(&cert.intern_name),
                program = escape(&cert.internship_program),
                company = escape(&cert.company_name),
                start = format_date(cert.start_date),
                end = format_date(cert.end_date),
                duration = escape(&cert.duration),
                issued = format_date(cert.issue_date),
                status_class = cert.status.to_string().to_lowercase(),
                status = cert.status,
            )?;
        }
        VerificationState::Invalid { .. } => {
            writeln!(
                out,
                r#"<h2 class="invalid">Invalid Certificate</h2><p>{}</p>"#,
                escape(&state.message())
            )?;
            writeln!(
                out,
                "<p>Please check the ID and try again, or contact the issuing organization.</p>"
            )?;
        }
    }

    out.push_str("</main>\n</body>\n</html>\n");
    Ok(out)
}
