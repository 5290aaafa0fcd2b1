use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::forms::FieldErrors;
use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session required")]
    SessionRequired,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid stock symbol")]
    InvalidSymbol,

    #[error("Watchlist not found")]
    UnknownWatchlist,

    #[error("Stock is not on the watchlist")]
    NotWatched,

    #[error("Plan not available")]
    UnknownPlan,

    #[error("Stock is already on the watchlist")]
    AlreadyWatched,

    #[error("Watchlist already exists")]
    WatchlistExists,

    #[error("Refresh already in progress")]
    RefreshInProgress,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::SessionRequired => StatusCode::UNAUTHORIZED,
            AppError::SessionNotFound
            | AppError::InvalidSymbol
            | AppError::UnknownWatchlist
            | AppError::NotWatched
            | AppError::UnknownPlan => StatusCode::NOT_FOUND,
            AppError::AlreadyWatched | AppError::WatchlistExists | AppError::RefreshInProgress => {
                StatusCode::CONFLICT
            }
            AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Source(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                json!({ "error": "Internal server error" })
            }
            AppError::Source(err) => {
                tracing::warn!(error = %err, "data source failure");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::SessionRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotWatched.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::RefreshInProgress.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidQuery("page".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Validation(FieldErrors::new()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(SourceError::Unavailable("down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
