use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::TripMetrics;
use crate::error::{not_found_error, Error};

#[derive(Serialize, Deserialize)]
pub struct ChangeStateParams {
    action: String,
}

#[debug_handler]
pub async fn change_state(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
    Json(params): Json<ChangeStateParams>,
) -> Result<StatusCode, Error> {
    api.apply_action(&id, &params.action).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn metrics(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<TripMetrics>, Error> {
    let metrics = api
        .trip_metrics(&id)
        .await?
        .ok_or_else(|| not_found_error("trip"))?;

    Ok(metrics.into())
}
