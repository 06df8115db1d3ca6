//! CLI output formatting utilities

use chrono::Utc;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{SessionDuration, User, UserSession};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a table of users
pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        info("No users found. Create one with 'sessiongate users add --email <email>'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            Cell::new(&user.id),
            Cell::new(&user.email),
            Cell::new(user.display_name()),
            Cell::new(user.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
}

/// Print a table of persisted sessions, marking the ones past expiry
pub fn print_session_table(sessions: &[UserSession], duration: SessionDuration) {
    if sessions.is_empty() {
        info("No persisted sessions");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Session").fg(Color::Cyan),
            Cell::new("User").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
            Cell::new("Expires").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
        ]);

    for session in sessions {
        let expires = duration
            .deadline(session.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        let (status, color) = if duration.is_expired(session.created_at, now) {
            ("expired", Color::Red)
        } else {
            ("active", Color::Green)
        };

        table.add_row(vec![
            Cell::new(&session.session_id),
            Cell::new(&session.user_id),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(expires),
            Cell::new(status).fg(color),
        ]);
    }

    println!("{table}");
}
