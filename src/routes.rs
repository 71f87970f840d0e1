//! Route definitions and router setup
//!
//! Configures all routes and middleware. Paths follow the
//! `/{Controller}/{Action}/{id?}` convention.

mod account;
mod admin;
mod bookings;
mod catalog;
mod feedback;
mod tours;

use crate::auth::{session_middleware, MaybeUser};
use crate::config::Settings;
use crate::models::ViewResponse;
use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware_stack = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Health check and landing page
        .route("/health", get(health_check))
        .route("/", get(home))

        // Admin
        .route("/Admin/Index", get(admin::index))
        .route(
            "/Admin/CreateTourGuide",
            get(admin::create_tour_guide_form).post(admin::create_tour_guide),
        )
        .route(
            "/Admin/EditTourGuide/{id}",
            get(admin::edit_tour_guide_form)
                .post(admin::edit_tour_guide)
                .put(admin::edit_tour_guide),
        )
        .route("/Admin/TourGuideManagement", get(admin::tour_guide_management))
        .route("/Admin/FeedbackManagement", get(admin::feedback_management))
        .route(
            "/Admin/ReplyFeedback/{id}",
            get(admin::reply_feedback_form).post(admin::reply_feedback),
        )
        .route(
            "/Admin/ListRegisterTravelAgent",
            get(admin::list_register_travel_agent),
        )
        .route("/Admin/RequestAccept", post(admin::request_accept))
        .route("/Admin/RequestUnaccept", post(admin::request_unaccept))

        // Tours
        .route("/Tours/ListTour", get(tours::list_tour))
        .route("/Tours/TourDetails/{id}", get(tours::tour_details))
        .route(
            "/Tours/CreateTour",
            get(tours::create_tour_form).post(tours::create_tour),
        )
        .route(
            "/Tours/EditTour/{id}",
            get(tours::edit_tour_form).post(tours::edit_tour),
        )
        .route(
            "/Tours/DeleteTour/{id}",
            get(tours::delete_tour_form).post(tours::delete_tour),
        )

        // Account
        .route("/Account/Register", post(account::register))
        .route("/Account/Login", post(account::login))
        .route("/Account/Logout", post(account::logout))

        // Bookings and feedback
        .route("/Booking/Create", post(bookings::create_booking))
        .route("/Booking/MyBookings", get(bookings::my_bookings))
        .route("/Feedback/Create", post(feedback::create_feedback))

        // Catalog
        .route("/Hotels/ListHotel", get(catalog::list_hotel))
        .route("/Hotels/HotelDetails/{id}", get(catalog::hotel_details))
        .route("/Restaurants/ListRestaurant", get(catalog::list_restaurant))
        .route(
            "/Restaurants/RestaurantDetails/{id}",
            get(catalog::restaurant_details),
        )
        .route("/Vehicles/ListVehicle", get(catalog::list_vehicle))
        .route("/Vehicles/VehicleDetails/{id}", get(catalog::vehicle_details))

        // Session cookie in, refreshed cookie out
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(DefaultBodyLimit::max(settings.server.max_upload_bytes))
        .layer(middleware_stack)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];
    let headers = [header::CONTENT_TYPE, header::ACCEPT];

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    } else {
        // Session cookies only travel to listed origins
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    }
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HomeModel {
    user_email: Option<String>,
    role: Option<String>,
}

/// GET /, showing who is logged in
async fn home(MaybeUser(claims): MaybeUser) -> Json<ViewResponse<HomeModel>> {
    Json(ViewResponse::new(
        "Home",
        HomeModel {
            user_email: claims.as_ref().map(|c| c.email.clone()),
            role: claims.map(|c| c.role.to_string()),
        },
    ))
}
