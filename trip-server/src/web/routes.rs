//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::domain::{DomainError, StopId, TripDraft, TripId, UserId};
use crate::schedule::ScheduleError;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(get_trip).delete(delete_trip))
        .route("/trips/:trip_id/schedule", get(trip_schedule))
        .route("/trips/:trip_id/days/:day/stops", get(day_schedule))
        .route("/trips/:trip_id/stops", post(create_stop))
        .route(
            "/trips/:trip_id/stops/:stop_id",
            patch(update_stop).delete(delete_stop),
        )
        .route("/trips/:trip_id/stops/:stop_id/move", patch(move_stop))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The acting user, taken from the `x-user-id` header.
///
/// Session handling lives outside this service; callers present a
/// resolved user id.
fn require_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(UserId)
        .ok_or(AppError::BadRequest {
            message: "missing or invalid x-user-id header".to_string(),
        })
}

/// Create a trip owned by the caller.
async fn create_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTripRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&headers)?;

    let draft = TripDraft {
        title: request.title,
        owner: user,
        start_date: request.start_date,
        end_date: request.end_date,
    };
    draft.validate()?;

    let trip = state.store.create_trip(draft).await;
    Ok((StatusCode::CREATED, Json(TripResponse::from(trip))))
}

/// Fetch a trip.
async fn get_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<u64>,
) -> Result<Json<TripResponse>, AppError> {
    let user = require_user(&headers)?;
    let trip = state.service.trip(user, TripId(trip_id)).await?;
    Ok(Json(TripResponse::from(trip)))
}

/// Delete a trip and everything it owns. Owner only.
async fn delete_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;

    let trip = state.store.trip(TripId(trip_id)).await?;
    if trip.owner != user {
        return Err(AppError::Forbidden {
            message: "only the owner may delete a trip".to_string(),
        });
    }

    state.store.remove_trip(trip.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The whole trip schedule, grouped by day.
async fn trip_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<u64>,
) -> Result<Json<TripScheduleResponse>, AppError> {
    let user = require_user(&headers)?;
    let trip_id = TripId(trip_id);

    let trip = state.service.trip(user, trip_id).await?;
    let stops = state.service.trip_schedule(user, trip_id).await?;

    let span = trip.duration_days().max(0) as u32;
    let mut days: Vec<DayScheduleResponse> = (1..=span)
        .map(|day_number| DayScheduleResponse {
            day_number,
            stops: Vec::new(),
        })
        .collect();

    for stop in stops {
        // stops on days beyond the span can't happen; partitions are
        // validated on write
        if let Some(day) = days.get_mut(stop.day_number as usize - 1) {
            day.stops.push(StopResponse::from(stop));
        }
    }

    Ok(Json(TripScheduleResponse {
        trip: TripResponse::from(trip),
        days,
    }))
}

/// One day's stops in position order.
async fn day_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((trip_id, day)): Path<(u64, u32)>,
) -> Result<Json<DayScheduleResponse>, AppError> {
    let user = require_user(&headers)?;

    let stops = state
        .service
        .day_schedule(user, TripId(trip_id), day)
        .await?;

    Ok(Json(DayScheduleResponse {
        day_number: day,
        stops: stops.into_iter().map(StopResponse::from).collect(),
    }))
}

/// Insert a stop into a day.
async fn create_stop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<u64>,
    Json(request): Json<CreateStopRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&headers)?;

    let day = request.day_number;
    let position = request.requested_position();
    let draft = request.into_draft();

    let stop = state
        .service
        .insert_stop(user, TripId(trip_id), day, position, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(StopResponse::from(stop))))
}

/// Edit a stop's fields.
async fn update_stop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((trip_id, stop_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateStopRequest>,
) -> Result<Json<StopResponse>, AppError> {
    let user = require_user(&headers)?;
    let patch = request.into_patch()?;

    let stop = state
        .service
        .update_stop(user, TripId(trip_id), StopId(stop_id), patch)
        .await?;

    Ok(Json(StopResponse::from(stop)))
}

/// Delete a stop.
async fn delete_stop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((trip_id, stop_id)): Path<(u64, u64)>,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;

    state
        .service
        .delete_stop(user, TripId(trip_id), StopId(stop_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Move a stop to a new day and/or position.
async fn move_stop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((trip_id, stop_id)): Path<(u64, u64)>,
    Json(request): Json<MoveStopRequest>,
) -> Result<Json<StopResponse>, AppError> {
    let user = require_user(&headers)?;

    let stop = state
        .service
        .move_stop(
            user,
            TripId(trip_id),
            StopId(stop_id),
            request.day_number,
            request.position,
        )
        .await?;

    Ok(Json(StopResponse::from(stop)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::PermissionDenied => AppError::Forbidden {
                message: e.to_string(),
            },
            ScheduleError::Validation(err) => AppError::BadRequest {
                message: err.to_string(),
            },
            ScheduleError::Store(err) => AppError::from(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TripNotFound(_)
            | StoreError::StopNotFound(_)
            | StoreError::StopNotInTrip { .. } => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        // Log errors to stderr for debugging
        eprintln!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
