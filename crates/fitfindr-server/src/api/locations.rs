use std::sync::{Mutex, PoisonError};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use fitfindr_core::{Coordinates, Location, LocationCategory, NewLocation};
use fitfindr_geo::{BatchEntry, CoordinateSink, GeocodeOutcome, GeocodeTarget, Resolver};
use fitfindr_store::{GeocodeSelection, LocationSearch, Store, StoreError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_store_error, parse_optional, parse_radius, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LocationQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeScopeQuery {
    pub scope: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeLocationResponse {
    pub id: Uuid,
    pub outcome: GeocodeOutcome,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeRunResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

/// Coordinate sink that takes the store lock once per save, so a bulk run
/// never holds it across a geocoding call.
struct SharedStoreSink<'a>(&'a Mutex<Store>);

impl CoordinateSink for SharedStoreSink<'_> {
    type Error = StoreError;

    fn save_coordinates(&mut self, id: Uuid, coordinates: Coordinates) -> Result<(), StoreError> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update_coordinates(id, coordinates)
    }
}

fn parse_location_id(req_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("'{raw}' is not a valid location id"),
        )
    })
}

fn parse_selection(req_id: &str, raw: Option<&str>) -> Result<GeocodeSelection, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None | Some("missing") => Ok(GeocodeSelection::MissingCoordinates),
        Some("all") => Ok(GeocodeSelection::All),
        Some(other) => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("scope must be 'missing' or 'all', got '{other}'"),
        )),
    }
}

/// Venues near `q` when it geocodes, otherwise name/city/state matches.
/// A blank `q` lists every venue in the category.
pub(super) async fn search_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ApiResponse<LocationSearch>>, ApiError> {
    let category: Option<LocationCategory> =
        parse_optional(&req_id.0, query.category.as_deref())?;
    let radius = parse_radius(&req_id.0, query.radius.as_deref())?;
    let q = query.q.unwrap_or_default();

    let center = if q.trim().is_empty() {
        None
    } else {
        state.geocoder.geocode_address(&q).await
    };

    let result = state
        .store()
        .search_locations(&q, center.map(|c| c.coordinates), radius, category)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(result, req_id))
}

pub(super) async fn get_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Location>>, ApiError> {
    let id = parse_location_id(&req_id.0, &id)?;
    let location = state
        .store()
        .get_location(id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("location {id} not found"),
            )
        })?;
    Ok(ApiResponse::new(location, req_id))
}

/// Create a venue. When the body carries no coordinates the full address is
/// geocoded first; a miss stores the venue without coordinates.
pub(super) async fn create_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(mut body): Json<NewLocation>,
) -> Result<(StatusCode, Json<ApiResponse<Location>>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "location name must be non-empty",
        ));
    }

    let needs_geocoding = body.latitude.is_none() && body.longitude.is_none();
    if needs_geocoding && !body.address.is_blank() {
        let query = body.address.full_address();
        match state.geocoder.geocode_address(&query).await {
            Some(found) => {
                body.latitude = Some(found.coordinates.latitude());
                body.longitude = Some(found.coordinates.longitude());
            }
            None => {
                tracing::warn!(name = %body.name, address = %query, "new location did not geocode");
            }
        }
    }

    let location = state
        .store()
        .insert_location(body)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok((StatusCode::CREATED, ApiResponse::new(location, req_id)))
}

/// Re-resolve one venue's coordinates from its stored address.
///
/// A failed resolution is a normal outcome and still returns 200; only an
/// unknown venue or a failed save is an error.
pub(super) async fn geocode_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GeocodeLocationResponse>>, ApiError> {
    let id = parse_location_id(&req_id.0, &id)?;
    let address = state
        .store()
        .get_location(id)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .map(|location| location.address)
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("location {id} not found"),
            )
        })?;

    let resolver = Resolver::new(&*state.geocoder, state.policy.clone());
    let outcome = resolver.resolve_one(&address).await;

    match outcome.coordinates() {
        Some(coordinates) => {
            state
                .store()
                .update_coordinates(id, coordinates)
                .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
            tracing::info!(%id, %coordinates, "location geocoded");
        }
        None => tracing::warn!(%id, "location geocoding failed"),
    }

    Ok(ApiResponse::new(GeocodeLocationResponse { id, outcome }, req_id))
}

/// Bulk geocoding run over venues missing coordinates, or all venues with
/// `scope=all`. Per-venue failures are reported in `entries`.
pub(super) async fn geocode_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeScopeQuery>,
) -> Result<Json<ApiResponse<GeocodeRunResponse>>, ApiError> {
    let selection = parse_selection(&req_id.0, query.scope.as_deref())?;
    let targets: Vec<GeocodeTarget> = state
        .store()
        .geocode_targets(selection)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let resolver = Resolver::new(&*state.geocoder, state.policy.clone());
    let mut sink = SharedStoreSink(&state.store);
    let report = resolver.run_batch(&targets, &mut sink).await;

    tracing::info!(
        total = report.total(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "geocoding run complete"
    );

    Ok(ApiResponse::new(
        GeocodeRunResponse {
            total: report.total(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            entries: report.entries,
        },
        req_id,
    ))
}
