//! CLI interface for sessiongate

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sessiongate")]
#[command(author = "Krakaw")]
#[command(version = "0.1.0")]
#[command(about = "Cookie session authentication for HTTP services", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new sessiongate.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to the config value)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the config value)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Inspect and clean up durable sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },

    /// Show whether a request path needs authentication
    CheckPath {
        /// Request path, e.g. /api/v1/status
        path: String,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a user
    Add {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SESSIONGATE_PASSWORD")]
        password: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// List users
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete a user by email
    Remove {
        email: String,
    },
}

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List persisted sessions
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove persisted sessions past their expiry
    Purge,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
