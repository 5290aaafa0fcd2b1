use axum::Json;
use utoipa::OpenApi;

use crate::models::{
    AddToWatchlistRequest, AlertKind, BillingCycle, BillingHistory, CheckoutRequest,
    ContactRequest, CreateWatchlistRequest, FormAccepted, Invoice, InvoiceStatus, MarketAlert,
    MarketIndex, MarketOverview, NewsArticle, PaymentOutcome, PaymentStatus, Plan, PlanId,
    PlanOffer, PlanSavings, PriceDisplay, SectorPerformance, SessionCreated, SignupRequest,
    StockDetail, StockRecord, WatchlistEntry, WatchlistStats,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "StockScan", description = "Mock market data and dashboard view state"),
    components(schemas(
        StockRecord,
        StockDetail,
        WatchlistEntry,
        WatchlistStats,
        AddToWatchlistRequest,
        CreateWatchlistRequest,
        MarketIndex,
        SectorPerformance,
        NewsArticle,
        AlertKind,
        MarketAlert,
        MarketOverview,
        PlanId,
        BillingCycle,
        Plan,
        PriceDisplay,
        PlanSavings,
        PlanOffer,
        InvoiceStatus,
        Invoice,
        BillingHistory,
        CheckoutRequest,
        PaymentStatus,
        PaymentOutcome,
        SignupRequest,
        ContactRequest,
        FormAccepted,
        SessionCreated,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
