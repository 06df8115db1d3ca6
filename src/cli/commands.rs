//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::auth::{
    self, requires_auth, DurableSessionAuth, ExpiringSessionAuth, SessionStore, User, UserSession,
};
use crate::cli::{
    error, info, print_session_table, print_user_table, success, warn, OutputFormat,
    SessionsAction, UsersAction,
};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::storage::{Collection, JsonStore};

/// Initialize a new sessiongate.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Add a user with 'sessiongate users add --email <email>' and run 'sessiongate serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

async fn open_users(config: &Config) -> Result<JsonStore<User>> {
    Ok(JsonStore::open(config.storage.users_path()).await?)
}

async fn open_sessions(config: &Config) -> Result<JsonStore<UserSession>> {
    Ok(JsonStore::open(config.storage.sessions_path()).await?)
}

/// User management commands
pub async fn users(action: UsersAction) -> Result<()> {
    let config = config::load_config()?;
    let store = open_users(&config).await?;

    match action {
        UsersAction::Add {
            email,
            password,
            first_name,
            last_name,
        } => {
            if !store.search(&[("email", email.as_str())]).await?.is_empty() {
                return Err(crate::error::Error::UserAlreadyExists(email).into());
            }
            let mut user = User::new(email, &password)?;
            user.first_name = first_name;
            user.last_name = last_name;
            let user = store.save(user).await?;
            success(&format!("Created user {} ({})", user.email, user.id));
        }
        UsersAction::List { format } => {
            let users = store.all().await;
            match format {
                OutputFormat::Table => print_user_table(&users),
                OutputFormat::Json => {
                    let infos: Vec<auth::UserInfo> = users.into_iter().map(Into::into).collect();
                    println!("{}", serde_json::to_string_pretty(&infos)?);
                }
                OutputFormat::Yaml => {
                    let infos: Vec<auth::UserInfo> = users.into_iter().map(Into::into).collect();
                    println!("{}", serde_yaml::to_string(&infos)?);
                }
            }
        }
        UsersAction::Remove { email } => {
            let found = store.search(&[("email", email.as_str())]).await?;
            if found.is_empty() {
                error(&format!("No user with email {}", email));
                return Ok(());
            }
            for user in found {
                store.remove(&user.id).await?;
            }
            success(&format!("Removed {}", email));
        }
    }

    Ok(())
}

/// Durable session commands
pub async fn sessions(action: SessionsAction) -> Result<()> {
    let config = config::load_config()?;
    let store = Arc::new(open_sessions(&config).await?);
    let duration = config.auth.duration();

    match action {
        SessionsAction::List { format } => {
            let sessions = store.all().await;
            match format {
                OutputFormat::Table => print_session_table(&sessions, duration),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sessions)?),
                OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&sessions)?),
            }
        }
        SessionsAction::Purge => {
            let auth = DurableSessionAuth::new(
                ExpiringSessionAuth::new(
                    auth::BasicSessionAuth::new(
                        SessionStore::new(),
                        config.auth.session_name.clone(),
                    ),
                    duration,
                ),
                store,
            );
            if duration.never_expires() {
                warn("Session duration is 0, sessions never expire");
                return Ok(());
            }
            let purged = auth.purge_expired().await?;
            success(&format!("Purged {} expired sessions", purged));
        }
    }

    Ok(())
}

/// Report whether a path is guarded
pub async fn check_path(path: &str) -> Result<()> {
    let config = config::load_config()?;

    if requires_auth(Some(path), &config.auth.excluded_paths) {
        info(&format!("{} requires authentication", path));
    } else {
        success(&format!("{} is exempt from authentication", path));
    }

    Ok(())
}
