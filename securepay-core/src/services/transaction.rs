//! Transaction service - per-user monetary entries with encrypted notes
//!
//! Notes are encrypted with the injected [`SecretManager`] before they reach
//! the store and decrypted per row on the way out. A row whose note cannot
//! be decrypted is rendered with a placeholder instead of failing the whole
//! listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{SessionContext, Transaction};
use crate::services::SecretManager;

/// Placeholder shown when a stored note cannot be decrypted
pub const DECRYPTION_FAILURE_PLACEHOLDER: &str = "[decryption error]";

/// A decrypted transaction as presented to the owning session
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub amount: Decimal,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Transaction service for recording and listing entries
pub struct TransactionService {
    repository: Arc<DuckDbRepository>,
    secrets: Arc<SecretManager>,
}

impl TransactionService {
    pub fn new(repository: Arc<DuckDbRepository>, secrets: Arc<SecretManager>) -> Self {
        Self {
            repository,
            secrets,
        }
    }

    /// Record a transaction for the session's user
    ///
    /// Requires an authenticated session and a positive amount. The note is
    /// encrypted before the single-row insert; there is no partial-write
    /// state to recover.
    pub fn add(
        &self,
        session: &SessionContext,
        amount: Decimal,
        note: &str,
    ) -> Result<Transaction> {
        let user = session.authenticated_user().ok_or(Error::Unauthenticated)?;

        if amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be a positive number"));
        }

        let ciphertext = self.secrets.encrypt(note)?;
        let mut tx = Transaction::new(user.id, amount, ciphertext);
        tx.id = self.repository.insert_transaction(&tx)?;

        Ok(tx)
    }

    /// List the session user's transactions, most recent first
    ///
    /// Recomputed fresh on every call. Decryption failures are isolated per
    /// row: the affected note renders as [`DECRYPTION_FAILURE_PLACEHOLDER`]
    /// and every other row is returned normally.
    pub fn list(&self, session: &SessionContext) -> Result<Vec<TransactionView>> {
        let user = session.authenticated_user().ok_or(Error::Unauthenticated)?;

        let rows = self.repository.get_transactions_by_user(user.id)?;
        let views = rows
            .into_iter()
            .map(|tx| TransactionView {
                amount: tx.amount,
                note: self
                    .secrets
                    .decrypt(&tx.note)
                    .unwrap_or_else(|_| DECRYPTION_FAILURE_PLACEHOLDER.to_string()),
                created_at: tx.created_at,
            })
            .collect();

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_repo(dir: &TempDir) -> Arc<DuckDbRepository> {
        let repo = DuckDbRepository::new(&dir.path().join("test.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        Arc::new(repo)
    }

    fn logged_in_session(repo: &DuckDbRepository, username: &str) -> SessionContext {
        let user = repo
            .insert_user(username, "hash", None, Utc::now())
            .unwrap()
            .unwrap();
        let mut session = SessionContext::new();
        session.login(user);
        session
    }

    #[test]
    fn test_add_then_list_round_trips_note() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let service = TransactionService::new(Arc::clone(&repo), secrets);
        let session = logged_in_session(&repo, "alice");

        service
            .add(&session, Decimal::new(4250, 2), "lunch")
            .unwrap();

        let views = service.list(&session).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].amount, Decimal::new(4250, 2));
        assert_eq!(views[0].note, "lunch");
    }

    #[test]
    fn test_note_is_encrypted_at_rest() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let service = TransactionService::new(Arc::clone(&repo), secrets);
        let session = logged_in_session(&repo, "alice");

        service
            .add(&session, Decimal::ONE, "very private text")
            .unwrap();

        let user_id = session.authenticated_user().unwrap().id;
        let stored = repo.get_transactions_by_user(user_id).unwrap();
        assert!(!stored[0]
            .note
            .windows(b"very private text".len())
            .any(|w| w == b"very private text"));
    }

    #[test]
    fn test_requires_authenticated_session() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let service = TransactionService::new(repo, secrets);
        let session = SessionContext::new();

        assert!(matches!(
            service.add(&session, Decimal::ONE, "note"),
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            service.list(&session),
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let service = TransactionService::new(Arc::clone(&repo), secrets);
        let session = logged_in_session(&repo, "alice");

        assert!(matches!(
            service.add(&session, Decimal::ZERO, "note"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.add(&session, Decimal::new(-100, 2), "note"),
            Err(Error::Validation(_))
        ));
        assert!(service.list(&session).unwrap().is_empty());
    }

    #[test]
    fn test_key_replacement_yields_placeholder_per_row() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let session = logged_in_session(&repo, "alice");

        let old_secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let old_service = TransactionService::new(Arc::clone(&repo), old_secrets);
        old_service
            .add(&session, Decimal::new(100, 2), "written with the old key")
            .unwrap();

        // The key is replaced; new entries use the new key
        let new_secrets = Arc::new(SecretManager::from_key([2u8; 32]));
        let new_service = TransactionService::new(Arc::clone(&repo), new_secrets);
        new_service
            .add(&session, Decimal::new(200, 2), "written with the new key")
            .unwrap();

        let views = new_service.list(&session).unwrap();
        assert_eq!(views.len(), 2);
        // Newest first: the readable row is unaffected by the broken one
        assert_eq!(views[0].note, "written with the new key");
        assert_eq!(views[1].note, DECRYPTION_FAILURE_PLACEHOLDER);
    }

    #[test]
    fn test_list_is_scoped_to_the_session_user() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let service = TransactionService::new(Arc::clone(&repo), secrets);

        let alice = logged_in_session(&repo, "alice");
        let bob = logged_in_session(&repo, "bob");

        service.add(&alice, Decimal::ONE, "alice's entry").unwrap();
        service.add(&bob, Decimal::ONE, "bob's entry").unwrap();

        let views = service.list(&alice).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].note, "alice's entry");
    }

    #[test]
    fn test_list_ordered_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let repo = test_repo(&dir);
        let secrets = Arc::new(SecretManager::from_key([1u8; 32]));
        let service = TransactionService::new(Arc::clone(&repo), Arc::clone(&secrets));
        let session = logged_in_session(&repo, "alice");
        let user_id = session.authenticated_user().unwrap().id;

        // Insert with explicit, out-of-order timestamps
        let base = Utc::now();
        for (offset_secs, note) in [(20i64, "second"), (40, "third"), (0, "first")] {
            let mut tx = Transaction::new(
                user_id,
                Decimal::ONE,
                secrets.encrypt(note).unwrap(),
            );
            tx.created_at = base + chrono::Duration::seconds(offset_secs);
            repo.insert_transaction(&tx).unwrap();
        }

        let notes: Vec<String> = service
            .list(&session)
            .unwrap()
            .into_iter()
            .map(|v| v.note)
            .collect();
        assert_eq!(notes, vec!["third", "second", "first"]);
    }
}
