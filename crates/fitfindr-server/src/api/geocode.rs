use axum::{
    extract::{Query, State},
    Extension, Json,
};
use fitfindr_core::GeocodingResult;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub q: Option<String>,
}

/// Best match for `q`, or `data: null` when nothing usable came back.
pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<Option<GeocodingResult>>>, ApiError> {
    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "query parameter 'q' must be non-empty",
        ));
    }

    let result = state.geocoder.geocode_address(&q).await;
    if result.is_none() {
        tracing::info!(query = %q, "geocode found no match");
    }
    Ok(ApiResponse::new(result, req_id))
}
