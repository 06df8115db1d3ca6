//! Authentication middleware and extractors

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::api::SharedState;
use crate::auth::User;
use crate::error::{Error, Result};

/// The authenticated user, attached to request extensions by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolve the user owning the session the request carries
pub async fn current_user(state: &SharedState, headers: &HeaderMap) -> Option<User> {
    let user_id = state.auth.resolve_identity(Some(headers)).await?;
    state.users.get(&user_id).await
}

/// Middleware for requiring authentication.
///
/// Exempt paths pass straight through. Otherwise a request with neither an
/// `Authorization` header nor a session cookie is rejected with 401, and one
/// whose session does not resolve to a user with 403.
pub async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let path = req.uri().path().to_string();
    if state
        .auth
        .is_exempt(Some(&path), &state.config.auth.excluded_paths)
    {
        return Ok(next.run(req).await);
    }

    let headers = req.headers();
    if state.auth.authorization_header(Some(headers)).is_none()
        && state.auth.extract_token(Some(headers)).is_none()
    {
        tracing::debug!("No credentials on {}", path);
        return Err(Error::Unauthorized);
    }

    let Some(user) = current_user(&state, headers).await else {
        tracing::debug!("No user for credentials on {}", path);
        return Err(Error::Forbidden);
    };

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
