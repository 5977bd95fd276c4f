use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::{
    AppState,
    auth::provided_token,
    booking::{BookingError, BookingForm, BookingSubmitter},
    error::ApiError,
    models::{CreatedBooking, PromotableContent, SessionInstance},
    promotions::load_active,
    schedule::resolve_sessions,
    store::ClassCatalog,
};

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromotionQuery {
    pub placement: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingPayload {
    pub class_id: String,
    #[serde(flatten)]
    pub form: BookingForm,
}

#[utoipa::path(get, path = "/", tag = "fitclub")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "FitClub Booking API",
        "endpoints": {
            "/classes/{class_id}/sessions": "Upcoming sessions of a class as JSON",
            "/classes/{class_id}/sessions.ical": "Upcoming sessions of a class as iCal file",
            "/bookings": "Book a session (POST)",
            "/promotions/active": "Active promotion for a placement"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "fitclub")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "fitclub")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn upcoming_sessions(state: &AppState, class_id: &str) -> Vec<SessionInstance> {
    let (_, today) = state.now();
    match state.store.get_class(class_id).await {
        Ok(class) => resolve_sessions(today, &class.schedule),
        Err(err) => {
            warn!(error = %err, class_id, "failed to load class schedule");
            Vec::new()
        }
    }
}

#[utoipa::path(
    get,
    path = "/classes/{class_id}/sessions",
    params(("class_id" = String, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "Upcoming sessions, empty when none", body = [SessionInstance])
    ),
    tag = "fitclub"
)]
pub async fn get_sessions(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> impl IntoResponse {
    Json(upcoming_sessions(&state, &class_id).await)
}

#[utoipa::path(
    get,
    path = "/classes/{class_id}/sessions.ical",
    params(("class_id" = String, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 404, description = "No upcoming sessions")
    ),
    tag = "fitclub"
)]
pub async fn get_sessions_ical(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, today) = state.now();
    let class = state.store.get_class(&class_id).await?;
    let sessions = resolve_sessions(today, &class.schedule);

    if sessions.is_empty() {
        return Err(ApiError::NotFound("No upcoming sessions".into()));
    }

    let body = state.exporter.generate(&class, &sessions);
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            (
                "content-disposition",
                "attachment; filename=class_sessions.ics",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    post,
    path = "/bookings",
    params(
        ("token" = Option<String>, Query, description = "User session token (alternative to Bearer header)")
    ),
    request_body = BookingPayload,
    responses(
        (status = 201, description = "Booking confirmed", body = CreatedBooking),
        (status = 400, description = "Malformed body, missing or invalid selection"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Unknown class"),
        (status = 502, description = "Booking could not be saved")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "fitclub"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<TokenQuery>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let token = provided_token(auth.map(|TypedHeader(a)| a), query.token.as_deref());
    let (_, today) = state.now();

    let BookingPayload { class_id, mut form } = payload;
    form.validate().map_err(BookingError::from)?;
    let class = state.store.get_class(&class_id).await?;

    let submitter = BookingSubmitter::new(&*state.store, &*state.store);
    let created = submitter
        .submit(&mut form, &class, token.as_deref(), today)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/promotions/active",
    params(("placement" = String, Query, description = "Placement key, e.g. home_banner")),
    responses(
        (status = 200, description = "Active promotion, or null when none", body = PromotableContent)
    ),
    tag = "fitclub"
)]
pub async fn get_active_promotion(
    State(state): State<AppState>,
    Query(query): Query<PromotionQuery>,
) -> impl IntoResponse {
    let (now, _) = state.now();
    Json(load_active(&*state.store, &query.placement, now).await)
}
