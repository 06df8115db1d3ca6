//! Session strategy tests across the basic, expiring and durable variants

use axum::http::{header::COOKIE, HeaderMap, HeaderValue, Request};
use chrono::{Duration, Utc};
use std::sync::Arc;

use sessiongate::auth::{
    build_strategy, requires_auth, AuthStrategy, BasicSessionAuth, DurableSessionAuth,
    ExpiringSessionAuth, SessionDuration, SessionStore, UserSession,
};
use sessiongate::config::{AuthConfig, StrategyKind};
use sessiongate::storage::{Collection, JsonStore};

const COOKIE_NAME: &str = "_my_session_id";

fn with_cookie(session_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("{}={}", COOKIE_NAME, session_id)).unwrap(),
    );
    headers
}

async fn open_sessions(dir: &tempfile::TempDir) -> Arc<JsonStore<UserSession>> {
    Arc::new(
        JsonStore::open(dir.path().join("user_sessions.json"))
            .await
            .unwrap(),
    )
}

async fn all_variants(dir: &tempfile::TempDir, secs: u64) -> Vec<Arc<dyn AuthStrategy>> {
    let sessions = open_sessions(dir).await;
    let duration = SessionDuration::from_secs(secs);
    vec![
        Arc::new(BasicSessionAuth::new(SessionStore::new(), COOKIE_NAME)),
        Arc::new(ExpiringSessionAuth::new(
            BasicSessionAuth::new(SessionStore::new(), COOKIE_NAME),
            duration,
        )),
        Arc::new(DurableSessionAuth::new(
            ExpiringSessionAuth::new(
                BasicSessionAuth::new(SessionStore::new(), COOKIE_NAME),
                duration,
            ),
            sessions,
        )),
    ]
}

#[test]
fn test_requires_auth_properties() {
    let v1 = vec!["/api/v1/*".to_string()];
    assert!(requires_auth(None, &v1));
    assert!(requires_auth(Some("/anything"), &[]));
    assert!(!requires_auth(Some("/api/v1/status"), &v1));
    assert!(requires_auth(Some("/api/v2/status"), &v1));
}

#[tokio::test]
async fn test_round_trip_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    for auth in all_variants(&dir, 0).await {
        for user_id in ["42", "user-7", "a@b.c"] {
            let session_id = auth.create_session(Some(user_id)).await.unwrap();
            assert_eq!(
                auth.user_id_for_session_id(Some(&session_id)).await.as_deref(),
                Some(user_id)
            );
            let req = with_cookie(&session_id);
            assert_eq!(auth.resolve_identity(Some(&req)).await.as_deref(), Some(user_id));
        }
    }
}

#[tokio::test]
async fn test_missing_user_id_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    for auth in all_variants(&dir, 0).await {
        assert!(auth.create_session(None).await.is_none());
    }
    let sessions = open_sessions(&dir).await;
    assert_eq!(sessions.count().await, 0);
}

#[tokio::test]
async fn test_login_logout_scenario_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    for auth in all_variants(&dir, 0).await {
        let session_id = auth.create_session(Some("42")).await.unwrap();
        let req = with_cookie(&session_id);

        assert_eq!(auth.resolve_identity(Some(&req)).await.as_deref(), Some("42"));
        assert!(auth.destroy_session(Some(&req)).await);
        assert!(!auth.destroy_session(Some(&req)).await);
        assert!(auth.resolve_identity(Some(&req)).await.is_none());
    }
}

#[tokio::test]
async fn test_destroy_without_cookie_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    for auth in all_variants(&dir, 0).await {
        let session_id = auth.create_session(Some("42")).await.unwrap();
        assert!(!auth.destroy_session(None).await);
        assert!(!auth.destroy_session(Some(&HeaderMap::new())).await);
        assert_eq!(
            auth.user_id_for_session_id(Some(&session_id)).await.as_deref(),
            Some("42")
        );
    }
}

#[tokio::test]
async fn test_token_extraction() {
    let auth = BasicSessionAuth::new(SessionStore::new(), COOKIE_NAME);
    let req = Request::builder()
        .uri("/api/v1/users/me")
        .header(COOKIE, format!("other=1; {}=abc", COOKIE_NAME))
        .header("Authorization", "Basic xyz")
        .body(())
        .unwrap();

    assert_eq!(auth.extract_token(Some(&req)).as_deref(), Some("abc"));
    assert_eq!(auth.authorization_header(Some(&req)).as_deref(), Some("Basic xyz"));
    assert!(auth.extract_token(None).is_none());
    assert!(auth.authorization_header(None).is_none());
}

#[tokio::test]
async fn test_expiring_boundary() {
    let auth = ExpiringSessionAuth::new(
        BasicSessionAuth::new(SessionStore::new(), COOKIE_NAME),
        SessionDuration::from_secs(5),
    );
    let session_id = auth.create_session(Some("42")).await.unwrap();
    let created_at = auth.store().get(&session_id).await.unwrap().created_at.unwrap();

    for offset in [0, 1, 4, 5] {
        assert_eq!(
            auth.user_id_at(&session_id, created_at + Duration::seconds(offset))
                .await
                .as_deref(),
            Some("42")
        );
    }
    for offset_ms in [5_001, 6_000, 60_000] {
        assert!(auth
            .user_id_at(&session_id, created_at + Duration::milliseconds(offset_ms))
            .await
            .is_none());
    }
}

#[tokio::test]
async fn test_durable_sessions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = AuthConfig {
        strategy: StrategyKind::Durable,
        session_duration: "3600".to_string(),
        ..AuthConfig::default()
    };

    let session_id = {
        let auth = build_strategy(&config, SessionStore::new(), open_sessions(&dir).await);
        auth.create_session(Some("42")).await.unwrap()
    };

    let restarted = build_strategy(&config, SessionStore::new(), open_sessions(&dir).await);
    let req = with_cookie(&session_id);
    assert_eq!(restarted.resolve_identity(Some(&req)).await.as_deref(), Some("42"));
    assert!(restarted.destroy_session(Some(&req)).await);
    assert!(restarted.resolve_identity(Some(&req)).await.is_none());
}

#[tokio::test]
async fn test_durable_expired_record_resolves_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let sessions = open_sessions(&dir).await;
    let mut record = UserSession::new("42", "stale");
    record.created_at = Utc::now() - Duration::seconds(10);
    sessions.save(record).await.unwrap();

    let config = AuthConfig {
        strategy: StrategyKind::Durable,
        session_duration: "5".to_string(),
        ..AuthConfig::default()
    };
    let auth = build_strategy(&config, SessionStore::new(), sessions);
    assert!(auth.user_id_for_session_id(Some("stale")).await.is_none());
    assert!(auth.resolve_identity(Some(&with_cookie("stale"))).await.is_none());
}

#[tokio::test]
async fn test_in_memory_strategies_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = AuthConfig {
        strategy: StrategyKind::Expiring,
        ..AuthConfig::default()
    };
    let store = SessionStore::new();
    let a = build_strategy(&config, store.clone(), open_sessions(&dir).await);
    let b = build_strategy(&config, store.clone(), open_sessions(&dir).await);

    let session_id = a.create_session(Some("42")).await.unwrap();
    assert_eq!(
        b.user_id_for_session_id(Some(&session_id)).await.as_deref(),
        Some("42")
    );
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_session_creation() {
    let store = SessionStore::new();
    let auth = Arc::new(BasicSessionAuth::new(store.clone(), COOKIE_NAME));

    let mut handles = Vec::new();
    for i in 0..50 {
        let auth = auth.clone();
        handles.push(tokio::spawn(async move {
            auth.create_session(Some(&i.to_string())).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len().await, 50);
}
