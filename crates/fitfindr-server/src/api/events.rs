use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use fitfindr_core::{DateWindow, EventFilter, EventType};
use fitfindr_store::EventSearch;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, parse_optional, parse_radius, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct EventQuery {
    pub q: Option<String>,
    pub event_type: Option<String>,
    pub date: Option<String>,
    pub radius: Option<String>,
}

/// Events near `q` when it geocodes, otherwise text matches on title,
/// description and venue city. A blank `q` lists every event passing the
/// type and date filters.
pub(super) async fn search_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<EventQuery>,
) -> Result<Json<ApiResponse<EventSearch>>, ApiError> {
    let event_type: Option<EventType> = parse_optional(&req_id.0, query.event_type.as_deref())?;
    let date: Option<DateWindow> = parse_optional(&req_id.0, query.date.as_deref())?;
    let radius = parse_radius(&req_id.0, query.radius.as_deref())?;
    let q = query.q.unwrap_or_default();

    let center = if q.trim().is_empty() {
        None
    } else {
        state.geocoder.geocode_address(&q).await
    };

    let filter = EventFilter::new(event_type, date, Utc::now());
    let result = state
        .store()
        .search_events(&q, center.map(|c| c.coordinates), radius, &filter)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(result, req_id))
}
