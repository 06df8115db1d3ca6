//! The contract every authentication strategy implements

use async_trait::async_trait;

use super::path::requires_auth;
use super::request::RequestAccessor;

/// Header inspected by [`AuthStrategy::authorization_header`]
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Session based authentication strategy.
///
/// Every failure collapses to `None` or `false`: missing requests, missing
/// cookies, unknown ids and expired sessions all look the same to callers.
/// Implementations that can fail internally log the cause and expose a
/// fallible variant of their own.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Name of the cookie the session id travels in
    fn cookie_name(&self) -> &str;

    /// Whether `path` skips authentication
    fn is_exempt(&self, path: Option<&str>, exclusions: &[String]) -> bool {
        !requires_auth(path, exclusions)
    }

    /// Raw `Authorization` header of the request
    fn authorization_header(&self, request: Option<&dyn RequestAccessor>) -> Option<String> {
        request?.header(AUTHORIZATION_HEADER).map(str::to_string)
    }

    /// Session id carried by the request's session cookie
    fn extract_token(&self, request: Option<&dyn RequestAccessor>) -> Option<String> {
        request?.cookie(self.cookie_name()).map(str::to_string)
    }

    /// Open a session for `user_id`, returning the new session id
    async fn create_session(&self, user_id: Option<&str>) -> Option<String>;

    /// User owning `session_id`, if the session is known and still valid
    async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String>;

    /// User owning the session the request carries
    async fn resolve_identity(&self, request: Option<&dyn RequestAccessor>) -> Option<String> {
        let token = self.extract_token(request)?;
        self.user_id_for_session_id(Some(&token)).await
    }

    /// End the session the request carries. True only when a session was removed.
    async fn destroy_session(&self, request: Option<&dyn RequestAccessor>) -> bool;
}
