//! StockScan: the data layer of a stock-screening dashboard, served over
//! HTTP from static mock data.

pub mod billing;
pub mod config;
pub mod error;
pub mod format;
pub mod forms;
pub mod handlers;
pub mod market;
pub mod middleware;
pub mod mock_data;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod scanner;
pub mod session;
pub mod source;
pub mod state;
pub mod table;
pub mod watchlist;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::*;
use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/openapi.json", get(openapi::openapi_json))
        // Market data
        .route("/api/stocks", get(get_stocks))
        .route("/api/stocks/refresh", post(refresh_stocks))
        .route("/api/scanner", get(scan))
        .route("/api/scanner/sectors", get(get_sectors))
        .route("/api/market/overview", get(get_overview))
        .route("/api/lookup", get(lookup))
        .route("/api/lookup/:symbol", get(lookup_symbol))
        .route("/api/news", get(get_news))
        .route("/api/news/alerts", get(get_alerts))
        // Plans, billing and forms
        .route("/api/plans", get(get_plans))
        .route("/api/billing/invoices", get(get_invoices))
        .route("/api/checkout", post(checkout))
        .route("/api/checkout/cancel", post(cancel_checkout))
        .route("/api/signup", post(signup))
        .route("/api/contact", post(contact))
        // Session view state
        .route("/api/session", post(create_session).delete(delete_session))
        .route("/api/session/tables/:table", get(get_table))
        .route("/api/session/tables/:table/sort", post(sort_table))
        .route("/api/session/tables/:table/page", post(set_page))
        .route("/api/session/tables/:table/refresh", post(refresh_table))
        .route("/api/session/scanner/criteria", get(get_criteria).put(set_criteria))
        .route("/api/session/watchlist", get(get_watchlist).post(add_to_watchlist))
        .route("/api/session/watchlist/available", get(available_stocks))
        .route("/api/session/watchlist/:symbol", delete(remove_from_watchlist))
        .route("/api/session/watchlists", get(get_book).post(create_watchlist))
        .route("/api/session/watchlists/refresh", post(refresh_book))
        .route("/api/session/watchlists/:name", get(get_named_list))
        .route("/api/session/watchlists/:name/stocks", post(add_to_named_list))
        .route(
            "/api/session/watchlists/:name/stocks/:symbol",
            delete(remove_from_named_list),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
