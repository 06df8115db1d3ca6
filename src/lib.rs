//! sessiongate - cookie session authentication for HTTP services
//!
//! The [`auth`] module holds the strategies: a path matcher deciding which
//! requests need a session, and basic, expiring and durable session
//! strategies behind the [`auth::AuthStrategy`] contract. [`api`] wires
//! them into an axum router.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::Error;
