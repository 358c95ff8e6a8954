//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};

use crate::application::authorization::Actor;
use crate::application::services::{
    AvailabilityService, BookingService, NewBooking, QrService,
};
use crate::domain::BookingStatus;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, EmptyData, ValidatedJson,
};

use super::dto::*;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub bookings: Arc<BookingService>,
    pub qr: Arc<QrService>,
    pub availability: Arc<AvailabilityService>,
    /// Base URL the QR scan-url fallback is reachable under
    pub public_base_url: String,
}

fn parse_datetime(value: &str, field: &'static str) -> Result<DateTime<Utc>, HandlerError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(format!("Invalid {field}: {e}"))),
            )
        })
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(CalendarParams),
    responses(
        (status = 200, description = "Calendar feed; students see only their own bookings", body = ApiResponse<Vec<BookingEventDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<ApiResponse<Vec<BookingEventDto>>>, HandlerError> {
    let from = params
        .start
        .as_deref()
        .map(|s| parse_datetime(s, "start"))
        .transpose()?;
    let to = params
        .end
        .as_deref()
        .map(|s| parse_datetime(s, "end"))
        .transpose()?;

    let details = state
        .bookings
        .calendar(&actor, from, to)
        .await
        .map_err(domain_error_response)?;

    let events = details.into_iter().map(BookingEventDto::from).collect();
    Ok(Json(ApiResponse::success(events)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking request submitted", body = ApiResponse<CreateBookingResponse>),
        (status = 422, description = "Validation failure or overlapping booking")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateBookingResponse>>), HandlerError> {
    let starts_at = parse_datetime(&request.starts_at, "starts_at")?;
    let ends_at = parse_datetime(&request.ends_at, "ends_at")?;

    let booking = state
        .bookings
        .create(
            &actor,
            NewBooking {
                lab_id: request.lab_id,
                equipment_id: request.equipment_id,
                title: request.title,
                starts_at,
                ends_at,
                notes: request.notes,
            },
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateBookingResponse {
            booking_id: booking.id,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/availability",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Equipment unavailable in the window", body = ApiResponse<AvailabilityResponse>),
        (status = 404, description = "Unknown lab"),
        (status = 422, description = "Invalid window")
    )
)]
pub async fn availability(
    State(state): State<BookingAppState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, HandlerError> {
    let starts_at = parse_datetime(&params.starts_at, "starts_at")?;
    let ends_at = parse_datetime(&params.ends_at, "ends_at")?;

    let unavailable = state
        .availability
        .unavailable_equipment(params.lab_id, starts_at, ends_at)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(AvailabilityResponse {
        unavailable,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/approvals",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending bookings awaiting approval", body = ApiResponse<Vec<PendingApprovalDto>>),
        (status = 403, description = "Approval authority required")
    )
)]
pub async fn pending_approvals(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<PendingApprovalDto>>>, HandlerError> {
    let pending = state
        .bookings
        .pending_approvals(&actor)
        .await
        .map_err(domain_error_response)?;

    let rows = pending.into_iter().map(PendingApprovalDto::from).collect();
    Ok(Json(ApiResponse::success(rows)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown booking")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingDto>>, HandlerError> {
    let details = state
        .bookings
        .details(&actor, id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(BookingDto::from(details))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<BookingStatusResponse>),
        (status = 403, description = "Approval authority required"),
        (status = 422, description = "Unknown status value")
    )
)]
pub async fn update_booking_status(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingStatusResponse>>, HandlerError> {
    // closed enum: anything outside the five states stops here
    let status = BookingStatus::parse(&request.status).ok_or_else(|| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!(
                "Unknown booking status '{}'",
                request.status
            ))),
        )
    })?;

    let booking = state
        .bookings
        .update_status(&actor, id, status)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(BookingStatusResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown booking")
    )
)]
pub async fn delete_booking(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state
        .bookings
        .delete(&actor, id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/approve",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking approved", body = ApiResponse<BookingStatusResponse>),
        (status = 403, description = "Approval authority required"),
        (status = 422, description = "Only pending bookings can be approved")
    )
)]
pub async fn approve_booking(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingStatusResponse>>, HandlerError> {
    let booking = state
        .bookings
        .approve(&actor, id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(BookingStatusResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingStatusResponse>),
        (status = 403, description = "Not the owner"),
        (status = 422, description = "Booking can no longer be cancelled")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingStatusResponse>>, HandlerError> {
    let booking = state
        .bookings
        .cancel(&actor, id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(BookingStatusResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/qr",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID"), IssueQrParams),
    responses(
        (status = 201, description = "Token issued", body = ApiResponse<QrTokenDto>),
        (status = 422, description = "QR can be issued only for confirmed bookings")
    )
)]
pub async fn issue_qr(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Query(params): Query<IssueQrParams>,
) -> Result<(StatusCode, Json<ApiResponse<QrTokenDto>>), HandlerError> {
    let token = state
        .qr
        .issue(&actor, id, params.ttl_minutes)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(QrTokenDto::from_token(
            &token,
            &state.public_base_url,
        ))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}/qr/latest",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Latest still-valid token", body = ApiResponse<QrTokenDto>),
        (status = 404, description = "No valid token found")
    )
)]
pub async fn latest_qr(
    State(state): State<BookingAppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<QrTokenDto>>, HandlerError> {
    let token = state
        .qr
        .latest_valid(&actor, id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(QrTokenDto::from_token(
        &token,
        &state.public_base_url,
    ))))
}
