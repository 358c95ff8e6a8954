//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::authorization::RoleProvider;
use crate::application::services::{AvailabilityService, BookingService, KioskService, QrService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::{bookings, equipment, health, kiosk, labs};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the campus identity provider"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Kiosk
        kiosk::handlers::scan,
        kiosk::handlers::scan_url,
        // Bookings
        bookings::handlers::list_bookings,
        bookings::handlers::create_booking,
        bookings::handlers::availability,
        bookings::handlers::pending_approvals,
        bookings::handlers::get_booking,
        bookings::handlers::update_booking_status,
        bookings::handlers::delete_booking,
        bookings::handlers::approve_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::issue_qr,
        bookings::handlers::latest_qr,
        // Labs
        labs::handlers::list_labs,
        labs::handlers::create_lab,
        labs::handlers::update_lab,
        labs::handlers::delete_lab,
        // Equipment
        equipment::handlers::list_equipment,
        equipment::handlers::create_equipment,
        equipment::handlers::update_equipment,
        equipment::handlers::delete_equipment,
        equipment::handlers::reorder_equipment,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            // Health
            health::handlers::HealthResponse,
            // Kiosk
            kiosk::dto::ScanRequest,
            kiosk::dto::ScanResponse,
            kiosk::dto::ScanSummaryDto,
            // Bookings
            bookings::dto::CreateBookingRequest,
            bookings::dto::UpdateBookingStatusRequest,
            bookings::dto::BookingEventDto,
            bookings::dto::BookingDto,
            bookings::dto::PendingApprovalDto,
            bookings::dto::CreateBookingResponse,
            bookings::dto::BookingStatusResponse,
            bookings::dto::QrTokenDto,
            bookings::dto::AvailabilityResponse,
            // Labs
            labs::dto::SaveLabRequest,
            labs::dto::LabDto,
            // Equipment
            equipment::dto::SaveEquipmentRequest,
            equipment::dto::ReorderEquipmentRequest,
            equipment::dto::EquipmentDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Kiosk", description = "Unauthenticated QR scan processing for physical kiosks"),
        (name = "Bookings", description = "Booking lifecycle: creation, approval, cancellation, QR issuance"),
        (name = "Labs", description = "Lab catalog management"),
        (name = "Equipment", description = "Equipment catalog management"),
    ),
    info(
        title = "Labdesk Booking API",
        version = "1.0.0",
        description = "REST API for campus lab equipment booking and QR-based checkout",
    )
)]
pub struct ApiDoc;

/// Create the full application router.
#[allow(clippy::too_many_arguments)]
pub fn create_router(
    repos: Arc<dyn RepositoryProvider>,
    roles: Arc<dyn RoleProvider>,
    jwt_config: JwtConfig,
    bookings_service: Arc<BookingService>,
    qr_service: Arc<QrService>,
    availability_service: Arc<AvailabilityService>,
    kiosk_service: Arc<KioskService>,
    metrics_handle: PrometheusHandle,
    public_base_url: String,
) -> Router {
    let middleware_state = AuthState {
        jwt_config,
        repos: repos.clone(),
        roles,
    };

    // ── Booking routes (protected) ─────────────────────────────
    let booking_state = bookings::BookingAppState {
        bookings: bookings_service,
        qr: qr_service,
        availability: availability_service,
        public_base_url,
    };
    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/availability", get(bookings::availability))
        .route("/approvals", get(bookings::pending_approvals))
        .route(
            "/{id}",
            get(bookings::get_booking)
                .patch(bookings::update_booking_status)
                .delete(bookings::delete_booking),
        )
        .route("/{id}/approve", post(bookings::approve_booking))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/qr", post(bookings::issue_qr))
        .route("/{id}/qr/latest", get(bookings::latest_qr))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(booking_state);

    // ── Catalog routes (protected) ─────────────────────────────
    let catalog_state = labs::CatalogAppState { repos };

    let lab_routes = Router::new()
        .route("/", get(labs::list_labs).post(labs::create_lab))
        .route("/{id}", axum::routing::put(labs::update_lab).delete(labs::delete_lab))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(catalog_state.clone());

    let equipment_routes = Router::new()
        .route(
            "/",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route("/reorder", post(equipment::reorder_equipment))
        .route(
            "/{id}",
            axum::routing::put(equipment::update_equipment).delete(equipment::delete_equipment),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(catalog_state);

    // ── Kiosk routes (public: kiosks are unauthenticated scanners) ──
    let kiosk_routes = Router::new()
        .route("/scan", post(kiosk::scan))
        .route("/scan-url/{token}", get(kiosk::scan_url))
        .with_state(kiosk::KioskAppState {
            kiosk: kiosk_service,
        });

    // ── Metrics (public scrape endpoint) ───────────────────────
    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: metrics_handle,
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Prometheus
        .merge(metrics_routes)
        // Kiosk
        .nest("/kiosk", kiosk_routes)
        // Bookings
        .nest("/api/v1/bookings", booking_routes)
        // Labs
        .nest("/api/v1/labs", lab_routes)
        // Equipment
        .nest("/api/v1/equipment", equipment_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
