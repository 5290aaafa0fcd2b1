use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    billing,
    error::AppError,
    forms,
    mock_data,
    models::{
        BillingCycle, BillingHistory, CheckoutRequest, ContactRequest, FormAccepted, PaymentOutcome,
        PlanOffer, SignupRequest,
    },
    state::AppState,
};

const SIGNUP_REDIRECT: &str = "/dashboard";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlansQuery {
    pub cycle: BillingCycle,
}

pub async fn get_plans(Query(query): Query<PlansQuery>) -> Json<Vec<PlanOffer>> {
    Json(billing::offers(mock_data::plans(), query.cycle))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InvoiceQuery {
    pub period: String,
    pub status: String,
}

impl Default for InvoiceQuery {
    fn default() -> Self {
        Self {
            period: "all".into(),
            status: "all".into(),
        }
    }
}

pub async fn get_invoices(
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<BillingHistory>, AppError> {
    let year = billing::parse_period(&query.period)?;
    let status = billing::parse_status(&query.status)?;
    Ok(Json(billing::history(mock_data::billing_history(), year, status)))
}

pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<PaymentOutcome>, AppError> {
    let outcome = billing::checkout(&mock_data::plans(), &req, &mut rand::thread_rng())
        .inspect_err(|_| tracing::warn!(plan = %req.plan, "checkout rejected"))?;

    tokio::time::sleep(state.config.checkout_delay).await;

    tracing::info!(
        plan = %req.plan,
        cycle = ?req.cycle,
        order = outcome.order_number.as_deref().unwrap_or_default(),
        "checkout completed"
    );
    Ok(Json(outcome))
}

pub async fn cancel_checkout() -> Json<PaymentOutcome> {
    tracing::info!("checkout cancelled");
    Json(billing::cancelled())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<FormAccepted>, AppError> {
    forms::validate_signup(&req).map_err(|fields| {
        tracing::warn!(fields = fields.len(), "signup rejected");
        AppError::Validation(fields)
    })?;

    tokio::time::sleep(state.config.signup_delay).await;

    tracing::info!(newsletter = req.subscribe_to_newsletter, "signup accepted");
    Ok(Json(FormAccepted {
        message: format!("Welcome, {}!", req.first_name.trim()),
        redirect: Some(SIGNUP_REDIRECT.to_string()),
    }))
}

pub async fn contact(Json(req): Json<ContactRequest>) -> Result<Json<FormAccepted>, AppError> {
    forms::validate_contact(&req).map_err(|fields| {
        tracing::warn!(fields = fields.len(), "contact form rejected");
        AppError::Validation(fields)
    })?;

    tracing::info!(subject = %req.subject, "contact message received");
    Ok(Json(FormAccepted {
        message: "Message received. We'll respond as soon as possible.".into(),
        redirect: None,
    }))
}
