use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use credence_common::{params::VerifyParams, views::VerificationResult};

use crate::{
    context::ApiContext,
    error::ApiError,
    render::html,
    verification::VerificationFlow,
};

async fn settle(ctx: &ApiContext, params: VerifyParams) -> Result<VerificationFlow, ApiError> {
    let mut flow = VerificationFlow::enter(params, ctx.config.verification_delay());
    flow.resolve(&*ctx.db).await?;
    Ok(flow)
}

/// Public verification page behind the links printed on certificates.
pub async fn verify_page(
    State(ctx): State<ApiContext>,
    Query(params): Query<VerifyParams>,
) -> Result<Html<String>, ApiError> {
    let flow = settle(&ctx, params).await?;
    Ok(Html(html::verification_page(flow.state())?))
}

#[utoipa::path(
    get,
    path = "/api/v1/verify",
    tags = ["verify"],
    params(VerifyParams),
    responses((status = 200, description = "Whether the certificate is genuine", body = VerificationResult))
)]
pub async fn verify_certificate(
    State(ctx): State<ApiContext>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<VerificationResult>, ApiError> {
    let flow = settle(&ctx, params).await?;
    Ok(Json(flow.into_result()))
}
