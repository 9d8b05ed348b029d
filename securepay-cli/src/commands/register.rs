//! Register command - create a new account

use anyhow::Result;
use dialoguer::{Input, Password};

use securepay_core::{is_strong_password, LogEvent};

use super::{get_context, get_logger, log_event, require_tty};
use crate::output;

pub fn run(
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let username = match username {
        Some(u) => u,
        None => {
            require_tty()?;
            Input::new().with_prompt("Username").interact_text()?
        }
    };
    let username = username.trim().to_string();

    let email = match email {
        Some(e) => e,
        None => {
            require_tty()?;
            Input::new()
                .with_prompt("Email (optional)")
                .allow_empty(true)
                .interact_text()?
        }
    };
    let email = email.trim().to_string();

    // A prompted password is confirmed; a flag-supplied one is taken as-is
    let password = match password {
        Some(p) => p,
        None => {
            require_tty()?;
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match.")
                .interact()?
        }
    };

    if username.is_empty() || password.is_empty() {
        output::warning("Fields cannot be empty.");
        return Ok(());
    }

    if !is_strong_password(&password) {
        log_event(&logger, LogEvent::warning("register_weak_password"));
        output::error("Password must be 8+ chars, include digit & symbol.");
        return Ok(());
    }

    let email = if email.is_empty() {
        None
    } else {
        Some(email.as_str())
    };

    if ctx
        .credential_service
        .register(&username, &password, email)?
    {
        log_event(&logger, LogEvent::info("user_registered"));
        output::success("Account created successfully! Please login.");
    } else {
        log_event(&logger, LogEvent::warning("register_username_taken"));
        output::error("Username already exists.");
    }

    Ok(())
}
