use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use credence_common::{
    caller::Permission,
    views::{ShareResponse, VerificationLinkResponse},
};

use super::certificates::load_certificate;
use crate::{
    auth::Auth,
    context::ApiContext,
    error::ApiError,
    export::{CaptureHost, ExportAdapter, HostEffect},
    render::{RenderedDocument, TemplateVariant, VariantParams, render},
};

async fn rendered(
    ctx: &ApiContext,
    id: &str,
    variant: TemplateVariant,
) -> Result<RenderedDocument, ApiError> {
    let cert = load_certificate(ctx, id).await?;
    Ok(render(&cert, &ctx.assets, variant)?)
}

fn adapter<'h>(ctx: &ApiContext, host: &'h CaptureHost) -> ExportAdapter<'h, CaptureHost> {
    ExportAdapter::new(host, ctx.assets.verification_base.clone())
}

/// A destructive notification from the adapter means the export failed.
fn export_failure(title: &str, description: &str) -> ApiError {
    ApiError::Export {
        title: title.into(),
        description: description.into(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/preview",
    tags = ["export"],
    params(("id" = String, Path, description = "Certificate ID"), VariantParams),
    responses(
        (status = 200, description = "Certificate as an HTML page", content_type = "text/html", body = String),
        (status = 404, description = "Not found"),
    )
)]
pub async fn preview_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    Query(query): Query<VariantParams>,
) -> Result<Html<String>, ApiError> {
    caller.require(Permission::CertificatesRead)?;
    Ok(Html(rendered(&ctx, &id, query.variant).await?.html))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/print",
    tags = ["export"],
    params(("id" = String, Path, description = "Certificate ID"), VariantParams),
    responses(
        (status = 200, description = "Certificate page that opens the print dialog", content_type = "text/html", body = String),
        (status = 404, description = "Not found"),
    )
)]
pub async fn print_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    Query(query): Query<VariantParams>,
) -> Result<Html<String>, ApiError> {
    caller.require(Permission::CertificatesRead)?;

    let doc = rendered(&ctx, &id, query.variant).await?;
    let host = CaptureHost::new(false);
    let note = adapter(&ctx, &host).print(&doc).await;
    if note.is_error() {
        return Err(export_failure(&note.title, &note.description));
    }

    host.take_effects()
        .into_iter()
        .find_map(|effect| match effect {
            HostEffect::Printed { html, .. } => Some(Html(html)),
            _ => None,
        })
        .ok_or_else(|| anyhow::anyhow!("print produced no page").into())
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/pdf",
    tags = ["export"],
    params(("id" = String, Path, description = "Certificate ID"), VariantParams),
    responses(
        (status = 200, description = "Certificate as a PDF attachment", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Not found"),
        (status = 422, description = "The certificate cannot be written as a PDF", body = credence_common::views::ApiErrorResponse),
    )
)]
pub async fn download_certificate_pdf(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    Query(query): Query<VariantParams>,
) -> Result<Response, ApiError> {
    caller.require(Permission::CertificatesRead)?;

    let doc = rendered(&ctx, &id, query.variant).await?;
    let host = CaptureHost::new(false);
    let note = adapter(&ctx, &host).download_pdf(Some(&doc)).await;
    if note.is_error() {
        return Err(export_failure(&note.title, &note.description));
    }

    let (file_name, bytes) = host
        .take_effects()
        .into_iter()
        .find_map(|effect| match effect {
            HostEffect::Saved { file_name, bytes } => Some((file_name, bytes)),
            _ => None,
        })
        .ok_or_else(|| anyhow::anyhow!("download produced no file"))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/share",
    tags = ["export"],
    params(("id" = String, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Share payload, or a notice to copy the link by hand", body = ShareResponse),
        (status = 404, description = "Not found"),
    )
)]
pub async fn share_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<ShareResponse>, ApiError> {
    caller.require(Permission::CertificatesRead)?;

    let cert = load_certificate(&ctx, &id).await?;
    let host = CaptureHost::new(true);
    let notification = adapter(&ctx, &host).share(&cert).await;

    let payload = host.take_effects().into_iter().find_map(|effect| match effect {
        HostEffect::Shared(payload) => Some(payload),
        _ => None,
    });

    Ok(Json(ShareResponse {
        notification,
        payload,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/link",
    tags = ["export"],
    params(("id" = String, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Verification link to copy", body = VerificationLinkResponse),
        (status = 404, description = "Not found"),
    )
)]
pub async fn certificate_verification_link(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<VerificationLinkResponse>, ApiError> {
    caller.require(Permission::CertificatesRead)?;

    let cert = load_certificate(&ctx, &id).await?;
    let host = CaptureHost::new(false);
    let notification = adapter(&ctx, &host).copy_verification_link(&cert).await;
    if notification.is_error() {
        return Err(export_failure(&notification.title, &notification.description));
    }

    let url = host
        .take_effects()
        .into_iter()
        .find_map(|effect| match effect {
            HostEffect::Clipboard(text) => Some(text),
            _ => None,
        })
        .ok_or_else(|| anyhow::anyhow!("copy produced no link"))?;

    Ok(Json(VerificationLinkResponse { url, notification }))
}
