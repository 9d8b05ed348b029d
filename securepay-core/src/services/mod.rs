//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and storage access. Each service
//! focuses on a specific use case or feature area.

mod credential;
pub mod logging;
pub mod migration;
mod secret;
mod status;
mod transaction;

pub use credential::{is_strong_password, CredentialService};
pub use logging::{LogEntry, LogEvent, LogLevel, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use secret::SecretManager;
pub use status::{DateRange, StatusService, StatusSummary};
pub use transaction::{
    TransactionService, TransactionView, DECRYPTION_FAILURE_PLACEHOLDER,
};
