//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod result;
mod session;
mod transaction;
mod user;

pub use session::{LoginOutcome, SessionContext};
pub use transaction::Transaction;
pub use user::User;
