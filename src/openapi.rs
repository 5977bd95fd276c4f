use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::booking::BookingForm;
use crate::handlers::BookingPayload;
use crate::models::{
    BookingRequest, BookingStatus, CreatedBooking, DayOfWeek, PromotableContent, SessionInstance,
};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_sessions,
        crate::handlers::get_sessions_ical,
        crate::handlers::create_booking,
        crate::handlers::get_active_promotion
    ),
    components(schemas(
        SessionInstance,
        DayOfWeek,
        BookingForm,
        BookingPayload,
        BookingRequest,
        BookingStatus,
        CreatedBooking,
        PromotableContent
    )),
    tags(
        (name = "fitclub", description = "Class sessions, bookings and promotions")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
