//! API Router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    AvailabilityService, JournalService, MemberService, PaymentService, ReservationService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{availability, courts, health, journal, members, payments, reservations};

/// Everything the HTTP layer needs, built once at startup.
#[derive(Clone)]
pub struct ApiServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub reservations: Arc<ReservationService>,
    pub availability: Arc<AvailabilityService>,
    pub members: Arc<MemberService>,
    pub journal: Arc<JournalService>,
    pub payments: Arc<PaymentService>,
    pub jwt_config: JwtConfig,
    pub data_dir: PathBuf,
    /// `/metrics` is only mounted when a recorder handle is supplied.
    pub metrics: Option<PrometheusHandle>,
}

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
                        .description(Some("JWT Bearer token"))
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
        health::health_check,
        // Availability
        availability::get_availability,
        // Courts
        courts::list_courts,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        // Journal
        journal::add_journal_entry,
        journal::list_journal_entries,
        // Payments
        payments::record_payment,
        payments::update_payment_status,
        payments::list_payments,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            crate::interfaces::http::common::ErrorBody,
            crate::interfaces::http::common::MessageResponse,
            crate::application::DayAvailability,
            crate::application::booking::CourtAvailability,
            crate::application::booking::SlotAvailability,
            crate::domain::Court,
            crate::domain::Reservation,
            crate::domain::ReservationStatus,
            crate::domain::Member,
            crate::domain::MemberRole,
            crate::domain::JournalEntry,
            crate::domain::Payment,
            crate::domain::PaymentStatus,
            reservations::CreateReservationRequest,
            reservations::UpdateReservationRequest,
            reservations::TimeSlotInput,
            reservations::TimeSlotPatch,
            members::CreateMemberRequest,
            members::UpdateMemberRequest,
            journal::CreateJournalEntryRequest,
            payments::RecordPaymentRequest,
            payments::UpdatePaymentStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Availability", description = "Free and booked slots per court for one day"),
        (name = "Courts", description = "Bookable courts"),
        (name = "Reservations", description = "Court bookings by members and guests"),
        (name = "Members", description = "Club member administration"),
        (name = "Journal", description = "Coaching notes per member"),
        (name = "Payments", description = "Provider-reported payments mirrored onto reservations"),
    ),
    info(
        title = "Court Booking API",
        version = "1.0.0",
        description = "REST API for booking tennis courts",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(services: ApiServices) -> Router {
    let auth_state = AuthState {
        jwt_config: services.jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Availability (public)
    let availability_routes = Router::new()
        .route("/", get(availability::get_availability))
        .with_state(availability::AvailabilityAppState {
            service: services.availability.clone(),
        });

    // Courts (public)
    let court_routes = Router::new()
        .route("/", get(courts::list_courts))
        .with_state(courts::CourtAppState {
            repos: services.repos.clone(),
        });

    // Reservations (public: guests book without an account)
    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::cancel_reservation),
        )
        .with_state(reservations::ReservationAppState {
            service: services.reservations.clone(),
        });

    // Members + journal (protected)
    let member_routes = Router::new()
        .route("/", get(members::list_members).post(members::create_member))
        .route("/{id}", get(members::get_member).put(members::update_member))
        .with_state(members::MemberAppState {
            service: services.members.clone(),
        });
    let journal_routes = Router::new()
        .route(
            "/{id}/journal",
            get(journal::list_journal_entries).post(journal::add_journal_entry),
        )
        .with_state(journal::JournalAppState {
            service: services.journal.clone(),
        });
    let member_routes = member_routes
        .merge(journal_routes)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Payments (protected)
    let payment_routes = Router::new()
        .route("/", get(payments::list_payments).post(payments::record_payment))
        .route("/{id}/status", put(payments::update_payment_status))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(payments::PaymentAppState {
            service: services.payments.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            data_dir: services.data_dir.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .merge(health_routes)
        .nest("/api/v1/availability", availability_routes)
        .nest("/api/v1/courts", court_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/members", member_routes)
        .nest("/api/v1/payments", payment_routes);

    if let Some(handle) = services.metrics {
        router = router.route(
            "/metrics",
            get(prometheus_metrics).with_state(MetricsState { handle }),
        );
    }

    router
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/v1/availability",
            "/api/v1/courts",
            "/api/v1/reservations",
            "/api/v1/reservations/{id}",
            "/api/v1/members",
            "/api/v1/members/{id}/journal",
            "/api/v1/payments/{id}/status",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
