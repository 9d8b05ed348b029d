//! Credential service - registration and password verification

use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use regex::Regex;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::User;

/// Check the password strength policy: at least 8 characters, at least one
/// digit, at least one non-alphanumeric symbol
///
/// Enforced by the presentation layer before calling `register`; exposed
/// here so every caller shares one definition.
pub fn is_strong_password(password: &str) -> bool {
    if password.len() < 8 {
        return false;
    }
    let has_digit = Regex::new(r"\d").unwrap().is_match(password);
    let has_symbol = Regex::new(r"[^\w\s]").unwrap().is_match(password);
    has_digit && has_symbol
}

/// Credential service for user registration and login verification
pub struct CredentialService {
    repository: Arc<DuckDbRepository>,
}

impl CredentialService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user
    ///
    /// Hashes the password with argon2 and inserts a user row. Returns
    /// `Ok(false)` when the username is already taken - an expected outcome
    /// that leaves the existing account untouched. Empty usernames and
    /// passwords are validation errors.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<bool> {
        if username.is_empty() {
            return Err(Error::validation("Username must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation("Password must not be empty"));
        }

        let password_hash = hash_password(password)?;
        let email = email.filter(|e| !e.is_empty());
        let inserted = self
            .repository
            .insert_user(username, &password_hash, email, Utc::now())?;

        Ok(inserted.is_some())
    }

    /// Verify credentials, returning the user on success
    ///
    /// Unknown username, wrong password, and a malformed stored hash all
    /// collapse to `Ok(None)`; the return value never distinguishes the
    /// cause. The hash comparison itself is argon2's constant-time verify.
    pub fn verify(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = match self.repository.find_user(username)? {
            Some(user) => user,
            None => return Ok(None),
        };

        let parsed = match PasswordHash::new(&user.password_hash) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(None),
        };

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_service(dir: &TempDir) -> CredentialService {
        let repo = DuckDbRepository::new(&dir.path().join("test.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        CredentialService::new(Arc::new(repo))
    }

    #[test]
    fn test_password_policy() {
        assert!(!is_strong_password("abc"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("abcdefg1"));
        assert!(!is_strong_password("abcdefg!"));
        assert!(is_strong_password("abcd123!"));
    }

    #[test]
    fn test_register_then_verify() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        assert!(service
            .register("alice", "Secret1!", Some("alice@example.com"))
            .unwrap());

        let user = service.verify("alice", "Secret1!").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        // The stored hash is opaque, never the plaintext
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn test_duplicate_username_keeps_original_hash() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        assert!(service.register("alice", "Secret1!", None).unwrap());
        assert!(!service.register("alice", "Other2@pw", None).unwrap());

        // The first password still verifies; the second never took effect
        assert!(service.verify("alice", "Secret1!").unwrap().is_some());
        assert!(service.verify("alice", "Other2@pw").unwrap().is_none());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        service.register("alice", "Secret1!", None).unwrap();
        assert!(service.verify("alice", "secret1!").unwrap().is_none());
        assert!(service.verify("alice", "").unwrap().is_none());
    }

    #[test]
    fn test_unknown_user_rejected() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        assert!(service.verify("nobody", "Secret1!").unwrap().is_none());
    }

    #[test]
    fn test_empty_fields_are_validation_errors() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        assert!(matches!(
            service.register("", "Secret1!", None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.register("alice", "", None),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_blank_email_stored_as_none() {
        let dir = TempDir::new().unwrap();
        let service = test_service(&dir);

        service.register("alice", "Secret1!", Some("")).unwrap();
        let user = service.verify("alice", "Secret1!").unwrap().unwrap();
        assert!(user.email.is_none());
    }
}
