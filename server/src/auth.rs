use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::info;

use crate::errors::AppError;
use crate::identity::Session;
use crate::state::AppState;

/// Request header carrying the identity token
pub const TOKEN_HEADER: &str = "x-token";

/// Resolve the session for this request from the `x-token` header.
///
/// A missing header gives an anonymous session. A header that is present
/// but does not hold a valid, unexpired token rejects the whole request.
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = match parts.headers.get(TOKEN_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| {
                info!("Token header is not valid ASCII");
                AppError::SessionExpiredOrInvalid
            })?),
            None => None,
        };

        state.sessions.resolve(presented).await
    }
}
