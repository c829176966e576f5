use axum::{Json, extract::State};
use credence_common::views::MapEmbed;

use crate::{context::ApiContext, error::ApiError};

/// Where the office map points, for the public contact page.
#[utoipa::path(
    get,
    path = "/api/v1/site/map",
    tags = ["site"],
    responses((status = 200, description = "Map embed settings", body = MapEmbed))
)]
pub async fn get_map_embed(State(ctx): State<ApiContext>) -> Result<Json<MapEmbed>, ApiError> {
    Ok(Json(ctx.config.map_embed()))
}
