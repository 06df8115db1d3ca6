//! API route handlers

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::{CurrentUser, LoginForm, UserInfo};
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Stats {
    pub users: usize,
    pub sessions: usize,
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

// Status routes

pub async fn status() -> impl IntoResponse {
    Json(ApiResponse::ok(serde_json::json!({ "status": "OK" })))
}

pub async fn stats(State(state): State<SharedState>) -> impl IntoResponse {
    Json(ApiResponse::ok(Stats {
        users: state.users.count().await,
        sessions: state.sessions.count().await,
    }))
}

pub async fn unauthorized() -> Error {
    Error::Unauthorized
}

pub async fn forbidden() -> Error {
    Error::Forbidden
}

pub async fn not_found() -> Error {
    Error::NotFound
}

// Session routes

pub async fn login(
    State(state): State<SharedState>,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    // A body that is not form encoded carries no fields
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let Some(email) = form.email.filter(|e| !e.is_empty()) else {
        return Err(Error::BadRequest("email missing".to_string()));
    };
    let Some(password) = form.password.filter(|p| !p.is_empty()) else {
        return Err(Error::BadRequest("password missing".to_string()));
    };

    let users = state.users.search(&[("email", email.as_str())]).await?;
    if users.is_empty() {
        return Ok(failure(StatusCode::NOT_FOUND, "no user found for this email"));
    }

    let Some(user) = users.into_iter().find(|u| u.is_valid_password(&password)) else {
        tracing::info!("Rejected login for {}", email);
        return Ok(failure(StatusCode::UNAUTHORIZED, "wrong password"));
    };

    let session_id = state
        .auth
        .create_session(Some(&user.id))
        .await
        .ok_or_else(|| Error::Other("could not open a session".to_string()))?;

    tracing::info!("User {} logged in", user.id);

    let cookie = format!("{}={}; Path=/", state.auth.cookie_name(), session_id);
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::ok(UserInfo::from(user))),
    )
        .into_response())
}

pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    if !state.auth.destroy_session(Some(&headers)).await {
        return Err(Error::NotFound);
    }
    Ok(Json(ApiResponse::ok(serde_json::json!({}))))
}

// User routes

pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    Json(ApiResponse::ok(UserInfo::from(user)))
}
