use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use credence_common::{
    caller::Permission,
    form::{CertificateForm, FormDefaults},
    params::{
        CreateCertificateParams, ListCertificatesParams, PaginationParams,
        UpdateCertificateParams,
    },
    views::{Certificate, PaginatedList},
};
use credence_db::storage::{CertificateFilter, CertificateStore, StoreError};
use tracing::{info, warn};

use crate::{auth::Auth, context::ApiContext, error::ApiError};

/// Generated ids are retried this many times before giving up.
const MAX_ID_ATTEMPTS: usize = 5;

/// Validate a submission and store it under a unique id.
///
/// A generated id that collides is replaced with a fresh one. An id the
/// caller chose is never replaced; a collision is a conflict.
pub(crate) async fn issue_certificate<S>(
    store: &S,
    form: &CertificateForm,
    params: CreateCertificateParams,
    now: DateTime<Utc>,
) -> Result<Certificate, ApiError>
where
    S: CertificateStore + Sync + ?Sized,
{
    let explicit_id = params.id.is_some();
    let mut cert = form.build(params, now)?;

    for attempt in 1..=MAX_ID_ATTEMPTS {
        match store.add(cert.clone().into()).await {
            Ok(created) => {
                info!(id = %created.id, "certificate issued");
                return Ok(created.into());
            }
            Err(StoreError::Conflict(id)) if !explicit_id => {
                warn!(id = %id, attempt, "generated certificate id already taken");
                cert.id = form.generate_id();
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(anyhow::anyhow!("could not allocate a unique certificate id").into())
}

pub(crate) async fn load_certificate(ctx: &ApiContext, id: &str) -> Result<Certificate, ApiError> {
    CertificateStore::get(&*ctx.db, id)
        .await?
        .map(Into::into)
        .ok_or_else(ApiError::not_found)
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates",
    tags = ["certificates"],
    params(ListCertificatesParams),
    responses((status = 200, description = "Issued certificates, oldest first", body = PaginatedList<Certificate>))
)]
pub async fn list_certificates(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Query(query): Query<ListCertificatesParams>,
) -> Result<Json<PaginatedList<Certificate>>, ApiError> {
    caller.require(Permission::CertificatesRead)?;

    let filter = CertificateFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let pagination = PaginationParams { limit: query.limit };
    let certs = CertificateStore::list(&*ctx.db, filter, pagination).await?;

    Ok(Json(PaginatedList {
        items: certs.into_iter().map(Into::into).collect(),
        limit: query.limit,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/defaults",
    tags = ["certificates"],
    responses((status = 200, description = "Values to pre-fill the generator form with", body = FormDefaults))
)]
pub async fn certificate_defaults(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
) -> Result<Json<FormDefaults>, ApiError> {
    caller.require(Permission::CertificatesWrite)?;
    Ok(Json(ctx.form.defaults(Utc::now().date_naive())))
}

#[utoipa::path(
    post,
    path = "/api/v1/certificates",
    tags = ["certificates"],
    request_body(content = CreateCertificateParams, content_type = "application/json"),
    responses(
        (status = 201, description = "Certificate issued", body = Certificate),
        (status = 400, description = "Required fields missing", body = credence_common::views::ApiErrorResponse),
        (status = 409, description = "Certificate ID already in use", body = credence_common::views::ApiErrorResponse),
    )
)]
pub async fn create_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Json(params): Json<CreateCertificateParams>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    caller.require(Permission::CertificatesWrite)?;

    let cert = issue_certificate(&*ctx.db, &ctx.form, params, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(cert)))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}",
    tags = ["certificates"],
    params(("id" = String, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate details", body = Certificate),
        (status = 404, description = "Not found"),
    )
)]
pub async fn get_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<Certificate>, ApiError> {
    caller.require(Permission::CertificatesRead)?;
    Ok(Json(load_certificate(&ctx, &id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/certificates/{id}",
    tags = ["certificates"],
    params(("id" = String, Path, description = "Certificate ID")),
    request_body(content = UpdateCertificateParams, content_type = "application/json"),
    responses(
        (status = 200, description = "Certificate updated", body = Certificate),
        (status = 400, description = "A required field was blanked", body = credence_common::views::ApiErrorResponse),
        (status = 404, description = "Not found"),
    )
)]
pub async fn update_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
    Json(params): Json<UpdateCertificateParams>,
) -> Result<Json<Certificate>, ApiError> {
    caller.require(Permission::CertificatesWrite)?;
    CertificateForm::validate_update(&params)?;

    let updated = CertificateStore::update(&*ctx.db, &id, params).await?;
    info!(id = %id, "certificate updated");
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/certificates/{id}",
    tags = ["certificates"],
    params(("id" = String, Path, description = "Certificate ID")),
    responses(
        (status = 204, description = "Certificate deleted"),
        (status = 404, description = "Not found"),
    )
)]
pub async fn delete_certificate(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require(Permission::CertificatesWrite)?;

    if !CertificateStore::delete(&*ctx.db, &id).await? {
        return Err(ApiError::not_found());
    }
    info!(id = %id, "certificate deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/certificates/{id}/toggle-status",
    tags = ["certificates"],
    params(("id" = String, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate with its new status", body = Certificate),
        (status = 404, description = "Not found"),
    )
)]
pub async fn toggle_certificate_status(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<Certificate>, ApiError> {
    caller.require(Permission::CertificatesWrite)?;

    let toggled = CertificateStore::toggle_status(&*ctx.db, &id).await?;
    info!(id = %id, status = %toggled.status, "certificate status toggled");
    Ok(Json(toggled.into()))
}
