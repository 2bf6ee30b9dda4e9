use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::verifier::{bearer_token, Identity};

/// Bearer token authentication extractor for protected routes
///
/// Rejects with 401 before the handler body runs. A missing or malformed
/// header never reaches the verifier.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     BearerAuth(identity): BearerAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", identity.subject))
/// }
/// ```
pub struct BearerAuth(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for BearerAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = bearer_token(header).map_err(|e| {
            tracing::debug!(reason = %e, "Rejected request without bearer token");
            ApiError::unauthorized()
        })?;

        let state = AppState::from_ref(state);
        let identity = state.verifier.verify(token).await.map_err(|e| {
            tracing::debug!(reason = %e, "Rejected request with invalid token");
            ApiError::unauthorized()
        })?;

        Ok(BearerAuth(identity))
    }
}
