//! Login command - authenticate and run an interactive session
//!
//! The session context lives for the duration of this command; once the
//! user logs out (or the process exits) it is gone, and the next `sp login`
//! starts anonymous again.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use rust_decimal::Decimal;

use securepay_core::{
    Error, LogEvent, LoggingService, LoginOutcome, SecurePayContext, SessionContext,
};

use super::{get_context, get_logger, log_event, require_tty};
use crate::output;

pub fn run(username: Option<String>, password: Option<String>) -> Result<()> {
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

    let password = match password {
        Some(p) => p,
        None => {
            require_tty()?;
            Password::new().with_prompt("Password").interact()?
        }
    };

    // One generic message regardless of which part failed
    let user = match ctx.credential_service.verify(&username, &password)? {
        Some(user) => user,
        None => {
            log_event(
                &logger,
                LogEvent::error("login_failed").with_message("invalid credentials"),
            );
            output::error("Invalid credentials.");
            return Ok(());
        }
    };

    let mut session = SessionContext::new();
    match session.login(user) {
        LoginOutcome::LoggedIn => {
            log_event(&logger, LogEvent::info("login_succeeded"));
            output::success(&format!("Welcome back, {}!", username));
        }
        LoginOutcome::AlreadyAuthenticated => {
            output::info(&format!("Already logged in as {}.", username));
        }
    }

    require_tty()?;
    session_loop(&ctx, &mut session, &logger)
}

fn session_loop(
    ctx: &SecurePayContext,
    session: &mut SessionContext,
    logger: &Option<LoggingService>,
) -> Result<()> {
    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Dashboard")
            .items(&[
                "Add transaction",
                "List transactions",
                "Profile",
                "Logout",
            ])
            .default(0)
            .interact()?;

        let result = match choice {
            0 => add_transaction(ctx, session, logger),
            1 => list_transactions(ctx, session),
            2 => show_profile(session),
            _ => {
                if let Some(user) = session.logout() {
                    log_event(logger, LogEvent::info("logout"));
                    output::success(&format!("You have logged out successfully, {}.", user.username));
                }
                return Ok(());
            }
        };

        // Recoverable problems are messages; the session keeps running
        if let Err(e) = result {
            output::error(&e.to_string());
        }
    }
}

fn add_transaction(
    ctx: &SecurePayContext,
    session: &SessionContext,
    logger: &Option<LoggingService>,
) -> Result<()> {
    let amount_input: String = Input::new()
        .with_prompt("Transaction amount")
        .interact_text()?;

    let amount: Decimal = match amount_input.trim().parse() {
        Ok(amount) => amount,
        Err(_) => {
            output::error("Amount must be numeric.");
            return Ok(());
        }
    };

    let note: String = Input::new()
        .with_prompt("Transaction note (encrypted in DB)")
        .allow_empty(true)
        .interact_text()?;

    match ctx.transaction_service.add(session, amount, &note) {
        Ok(_) => {
            log_event(logger, LogEvent::info("transaction_added"));
            output::success("Transaction added securely.");
        }
        Err(Error::Validation(msg)) => output::error(&msg),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn list_transactions(ctx: &SecurePayContext, session: &SessionContext) -> Result<()> {
    let entries = ctx.transaction_service.list(session)?;

    if entries.is_empty() {
        output::info("No transactions yet.");
        return Ok(());
    }

    println!("{}", "Recent Transactions".bold());
    let mut table = output::create_table();
    table.set_header(vec!["Amount", "Note", "Date"]);
    for entry in &entries {
        table.add_row(vec![
            entry.amount.to_string(),
            entry.note.clone(),
            entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn show_profile(session: &SessionContext) -> Result<()> {
    let user = session
        .authenticated_user()
        .ok_or(Error::Unauthenticated)?;

    println!("{}", "Profile Information".bold());
    println!("  Username: {}", user.username);
    println!("  Email: {}", user.email.as_deref().unwrap_or("-"));
    println!("  Created At: {}", user.created_at.format("%Y-%m-%d"));

    Ok(())
}
