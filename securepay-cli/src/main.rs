//! SecurePay CLI - encrypted transaction records in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{login, logs, register, status};

/// SecurePay - encrypted transaction records in your terminal
#[derive(Parser)]
#[command(name = "sp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Username
        #[arg(long)]
        username: Option<String>,
        /// Email address (optional)
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted with confirmation when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in and open an interactive session
    Login {
        /// Username
        #[arg(long)]
        username: Option<String>,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show store status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => register::run(username, email, password),
        Commands::Login { username, password } => login::run(username, password),
        Commands::Status { json } => status::run(json),
        Commands::Logs { command } => logs::run(command),
    }
}
