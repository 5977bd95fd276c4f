pub mod auth;
pub mod booking;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod openapi;
pub mod promotions;
pub mod schedule;
pub mod settings;
pub mod store;
pub mod validation;
pub mod widget;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use handlers::{
    create_booking, get_active_promotion, get_sessions, get_sessions_ical, healthz_live,
    healthz_ready, root,
};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ical::ICalExporter;
use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::store::EntityStoreClient;

/// Source of the current instant; read once per request.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<EntityStoreClient>,
    pub exporter: Arc<ICalExporter>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let store = EntityStoreClient::new(
            settings.store_base_url.clone(),
            settings.store_api_key.clone(),
        );
        let exporter = ICalExporter::new(settings.club_name.clone(), settings.club_location.clone());
        Self {
            settings,
            store: Arc::new(store),
            exporter: Arc::new(exporter),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The current instant and the club-local date it falls on.
    pub fn now(&self) -> (DateTime<Utc>, NaiveDate) {
        let now = (self.clock)();
        (now, self.settings.local_date(now))
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::new(settings);
    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!(
        store = %state.settings.store_base_url,
        timezone = %state.settings.timezone,
        "Starting FitClub Booking API on {addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/classes/{class_id}/sessions", get(get_sessions))
        .route("/classes/{class_id}/sessions.ical", get(get_sessions_ical))
        .route("/bookings", post(create_booking))
        .route("/promotions/active", get(get_active_promotion))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(CorsLayer::permissive()).layer(trace_layer)
}
