use axum::{Json, extract::State};
use credence_common::views::ServerWellKnownResponse;

use crate::{context::ApiContext, error::ApiError};

#[utoipa::path(
    get,
    path = "/.well-known/credence/server",
    tags = ["well-known"],
    responses(
        (status = 200, description = "Server configuration", body = ServerWellKnownResponse),
    )
)]
pub async fn get_server_well_known(
    State(ctx): State<ApiContext>,
) -> Result<Json<ServerWellKnownResponse>, ApiError> {
    Ok(Json(ServerWellKnownResponse {
        server_version: env!("CARGO_PKG_VERSION").to_string(),
        public_url: ctx.config.public_url.clone(),
    }))
}
