//! Authentication and session management

pub mod durable;
pub mod expiring;
pub mod middleware;
pub mod models;
pub mod path;
pub mod request;
pub mod session;
pub mod strategy;

pub use durable::DurableSessionAuth;
pub use expiring::{ExpiringSessionAuth, SessionDuration};
pub use middleware::{current_user, require_auth, CurrentUser};
pub use models::{LoginForm, User, UserInfo, UserSession};
pub use path::requires_auth;
pub use request::RequestAccessor;
pub use session::{BasicSessionAuth, SessionEntry, SessionStore};
pub use strategy::AuthStrategy;

use std::sync::Arc;

use crate::config::{AuthConfig, StrategyKind};
use crate::storage::Collection;

/// Build the strategy selected by `config` over a shared session store
pub fn build_strategy(
    config: &AuthConfig,
    store: SessionStore,
    sessions: Arc<dyn Collection<UserSession>>,
) -> Arc<dyn AuthStrategy> {
    let basic = BasicSessionAuth::new(store, config.session_name.clone());
    match config.strategy {
        StrategyKind::Basic => Arc::new(basic),
        StrategyKind::Expiring => Arc::new(ExpiringSessionAuth::new(basic, config.duration())),
        StrategyKind::Durable => Arc::new(DurableSessionAuth::new(
            ExpiringSessionAuth::new(basic, config.duration()),
            sessions,
        )),
    }
}
