mod events;
mod geocode;
mod locations;

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use fitfindr_core::CoreError;
use fitfindr_geo::{NominatimGeocoder, ResolvePolicy, SearchRadius};
use fitfindr_store::{Store, StoreError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Shared handler state.
///
/// The store lock is only ever taken between awaits: handlers geocode first,
/// then lock, read or write, and release.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    geocoder: Arc<NominatimGeocoder>,
    policy: ResolvePolicy,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store, geocoder: NominatimGeocoder, policy: ResolvePolicy) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            geocoder: Arc::new(geocoder),
            policy,
        }
    }

    /// The store holds no state outside its database, so a poisoned lock
    /// still guards a usable connection.
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    locations: usize,
    events: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, req_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(req_id.0),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::LocationNotFound(_) => ApiError::new(request_id, "not_found", error.to_string()),
        StoreError::Validation(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        _ => {
            tracing::error!(error = %error, "store operation failed");
            ApiError::new(request_id, "internal_error", "store operation failed")
        }
    }
}

/// Parse an optional enum-valued query parameter. Blank means no filter.
pub(super) fn parse_optional<T>(req_id: &str, raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = CoreError>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: CoreError| ApiError::new(req_id, "validation_error", e.to_string())),
    }
}

/// Parse an optional `radius` query parameter, defaulting to 25 miles.
pub(super) fn parse_radius(req_id: &str, raw: Option<&str>) -> Result<SearchRadius, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(SearchRadius::default()),
        Some(value) => value
            .parse()
            .map_err(|e: fitfindr_geo::GeoError| {
                ApiError::new(req_id, "validation_error", e.to_string())
            }),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/geocode", get(geocode::geocode))
        .route(
            "/api/v1/locations",
            get(locations::search_locations).post(locations::create_location),
        )
        .route(
            "/api/v1/locations/geocode",
            post(locations::geocode_locations),
        )
        .route("/api/v1/locations/{id}", get(locations::get_location))
        .route(
            "/api/v1/locations/{id}/geocode",
            post(locations::geocode_location),
        )
        .route("/api/v1/events", get(events::search_events))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<HealthData>>, ApiError> {
    let counts = {
        let store = state.store();
        store
            .count_locations()
            .and_then(|locations| store.count_events().map(|events| (locations, events)))
    };
    let (locations, events) = counts.map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(
        HealthData {
            status: "ok",
            locations,
            events,
        },
        req_id,
    ))
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
