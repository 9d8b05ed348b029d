//! SecurePay Core - credential and transaction-record management
//!
//! This crate implements the core logic of the SecurePay demo:
//!
//! - **domain**: Core entities (User, Transaction, SessionContext)
//! - **services**: Business logic orchestration (credentials, transactions,
//!   secret key handling, status, logging, migrations)
//! - **adapters**: Concrete storage (DuckDB)
//!
//! The presentation layer owns a [`SessionContext`] and passes it to every
//! operation that needs the caller's identity; nothing in this crate holds
//! session state globally.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{LoginOutcome, SessionContext, Transaction, User};
pub use services::{
    is_strong_password, CredentialService, LogEntry, LogEvent, LogLevel, LoggingService,
    SecretManager, StatusService, StatusSummary, TransactionService, TransactionView,
    DECRYPTION_FAILURE_PLACEHOLDER,
};

/// Main context for SecurePay operations
///
/// This is the primary entry point for the presentation layer. Construction
/// loads the configuration, opens the store, runs migrations, and loads (or
/// creates) the symmetric key; any failure here is fatal for the process.
pub struct SecurePayContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub secrets: Arc<SecretManager>,
    pub credential_service: CredentialService,
    pub transaction_service: TransactionService,
    pub status_service: StatusService,
}

impl SecurePayContext {
    /// Create a new SecurePay context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(&config.database_file);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        let key_path = data_dir.join(&config.key_file);
        let secrets = Arc::new(SecretManager::load_or_create(&key_path)?);

        // Create services
        let credential_service = CredentialService::new(Arc::clone(&repository));
        let transaction_service =
            TransactionService::new(Arc::clone(&repository), Arc::clone(&secrets));
        let status_service = StatusService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            secrets,
            credential_service,
            transaction_service,
            status_service,
        })
    }
}
