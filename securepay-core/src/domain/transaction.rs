//! Transaction domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A single monetary entry belonging to a user, as persisted
///
/// The `note` field holds the AES-256-GCM blob (12-byte nonce followed by
/// ciphertext and tag); plaintext never reaches the store. Rows are append
/// only: a transaction is never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub note: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction pending insertion (`id` assigned by the store)
    pub fn new(user_id: i64, amount: Decimal, note: Vec<u8>) -> Self {
        Self {
            id: 0,
            user_id,
            amount,
            note,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_creation_time() {
        let before = Utc::now();
        let tx = Transaction::new(7, Decimal::new(4250, 2), vec![1, 2, 3]);
        let after = Utc::now();

        assert_eq!(tx.user_id, 7);
        assert_eq!(tx.amount, Decimal::new(4250, 2));
        assert!(tx.created_at >= before && tx.created_at <= after);
    }
}
