use axum::extract::State;

use crate::{context::ApiContext, error::ApiError};

pub mod certificates;
pub mod export;
pub mod site;
pub mod verify;
pub mod well_known;

#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses((status = 200, description = "Service is healthy", body = String))
)]
pub async fn health_check(State(ctx): State<ApiContext>) -> Result<&'static str, ApiError> {
    ctx.db.ping().await?;
    Ok("Healthy")
}
