use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub const SESSION_HEADER: &str = "X-Session-Id";

/// Id of a live session, taken from the `X-Session-Id` header.
pub struct SessionId(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::SessionRequired)?;

        let id = Uuid::parse_str(header.trim()).map_err(|_| AppError::SessionRequired)?;

        if !state.sessions.contains(id) {
            return Err(AppError::SessionNotFound);
        }

        Ok(SessionId(id))
    }
}
