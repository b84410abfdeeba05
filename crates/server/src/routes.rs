use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod accounts;

pub use accounts::AppState;

pub async fn home() -> &'static str {
    "Welcome to the ATM app!"
}

/// Build the application router with the account routes and HTTP middleware.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let account_routes = Router::new()
        .route("/accounts", post(accounts::find_account))
        .route("/accounts/:account_number", get(accounts::account_page))
        .route("/accounts/:account_number/balance", get(accounts::balance))
        .route("/accounts/:account_number/withdraw", post(accounts::withdraw))
        .route("/accounts/:account_number/deposit", post(accounts::deposit));

    Router::new()
        .route("/", get(home))
        .merge(account_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
