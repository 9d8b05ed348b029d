//! Secret manager - symmetric key handling and note encryption
//!
//! The key is a 32-byte AES-256-GCM key persisted base64-encoded in a key
//! file. It is loaded once at startup and read-only afterwards; there is no
//! rotation. Encrypted blobs are nonce + ciphertext + tag, with a fresh
//! random nonce per encryption.

use std::fs;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use rand::Rng;

use crate::domain::result::{Error, Result};

/// Size of the AES-256 key in bytes
const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Holds the symmetric key and performs note encryption/decryption
///
/// Constructed once at startup and injected into the services that need it;
/// tests substitute a fixed key via [`SecretManager::from_key`].
pub struct SecretManager {
    key: [u8; KEY_SIZE],
}

impl SecretManager {
    /// Load the key from `path`, or generate and persist a new one
    ///
    /// An unreadable or unwritable path, or a key file that does not decode
    /// to exactly 32 bytes, is a fatal startup error - no retry.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        let key = if path.exists() {
            let content = fs::read_to_string(path)?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(content.trim())
                .map_err(|e| Error::secret(format!("Invalid key file encoding: {}", e)))?;
            bytes.try_into().map_err(|_| {
                Error::secret(format!("Key file must hold exactly {} bytes", KEY_SIZE))
            })?
        } else {
            let key: [u8; KEY_SIZE] = rand::thread_rng().gen();
            fs::write(path, base64::engine::general_purpose::STANDARD.encode(key))?;
            key
        };

        Ok(Self::from_key(key))
    }

    /// Build a manager around a caller-supplied key
    pub fn from_key(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Encrypt note text; output is nonce + ciphertext + tag
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| Error::encryption(format!("Failed to create cipher: {}", e)))?;

        let nonce_bytes: [u8; NONCE_SIZE] = rand::thread_rng().gen();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::encryption(format!("Encryption failed: {}", e)))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a blob produced by [`SecretManager::encrypt`]
    ///
    /// Fails on a wrong key, a truncated blob, or tampered ciphertext (the
    /// GCM tag authenticates the whole message).
    pub fn decrypt(&self, blob: &[u8]) -> Result<String> {
        if blob.len() < NONCE_SIZE {
            return Err(Error::encryption("Ciphertext too short"));
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| Error::encryption(format!("Failed to create cipher: {}", e)))?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::encryption("Decryption failed: wrong key or corrupted data"))?;

        String::from_utf8(plaintext)
            .map_err(|e| Error::encryption(format!("Invalid UTF-8 in decrypted note: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_manager() -> SecretManager {
        SecretManager::from_key([7u8; KEY_SIZE])
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let secrets = test_manager();
        let blob = secrets.encrypt("lunch with client").unwrap();
        assert_eq!(secrets.decrypt(&blob).unwrap(), "lunch with client");
    }

    #[test]
    fn test_empty_note_round_trip() {
        let secrets = test_manager();
        let blob = secrets.encrypt("").unwrap();
        assert_eq!(secrets.decrypt(&blob).unwrap(), "");
    }

    #[test]
    fn test_different_nonces_per_encryption() {
        let secrets = test_manager();
        let a = secrets.encrypt("same text").unwrap();
        let b = secrets.encrypt("same text").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = test_manager().encrypt("secret note").unwrap();
        let other = SecretManager::from_key([9u8; KEY_SIZE]);
        assert!(other.decrypt(&blob).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let secrets = test_manager();
        let mut blob = secrets.encrypt("secret note").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;
        assert!(secrets.decrypt(&blob).is_err());
    }

    #[test]
    fn test_truncated_blob_fails() {
        let secrets = test_manager();
        assert!(secrets.decrypt(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_key_file_created_and_reused() {
        let dir = tempdir().unwrap();
        let key_path = dir.path().join("secret.key");

        let first = SecretManager::load_or_create(&key_path).unwrap();
        assert!(key_path.exists());
        let blob = first.encrypt("persisted").unwrap();

        // A second load reads the same key back
        let second = SecretManager::load_or_create(&key_path).unwrap();
        assert_eq!(second.decrypt(&blob).unwrap(), "persisted");
    }

    #[test]
    fn test_malformed_key_file_is_fatal() {
        let dir = tempdir().unwrap();
        let key_path = dir.path().join("secret.key");

        std::fs::write(&key_path, "not base64!!!").unwrap();
        assert!(SecretManager::load_or_create(&key_path).is_err());

        std::fs::write(
            &key_path,
            base64::engine::general_purpose::STANDARD.encode([1u8; 16]),
        )
        .unwrap();
        assert!(SecretManager::load_or_create(&key_path).is_err());
    }
}
