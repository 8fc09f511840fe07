use axum::extract::{Extension, Json};
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Bid, BidRequest};
use crate::error::{not_found_error, Error};

#[derive(Serialize, Deserialize)]
pub struct EvaluateParams {
    request: BidRequest,
    #[serde(default)]
    bids: Vec<Bid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateResponse {
    winner: Bid,
}

#[debug_handler]
pub async fn evaluate(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<EvaluateParams>,
) -> Result<Json<EvaluateResponse>, Error> {
    let winner = api
        .evaluate_bids(params.request, params.bids)
        .await?
        .ok_or_else(|| not_found_error("accepted bid"))?;

    Ok(EvaluateResponse { winner }.into())
}
