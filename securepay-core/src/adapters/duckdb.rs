//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{Transaction, User};
use crate::migrations::MIGRATIONS;
use crate::services::{DateRange, MigrationService};

/// Check if an error message indicates a UNIQUE constraint violation
///
/// DuckDB reports constraint failures only through the error text, so the
/// classification matches on the stable fragments of that message.
fn is_unique_violation(err: &duckdb::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("duplicate key") || msg.contains("unique constraint")
}

/// DuckDB repository implementation
///
/// One connection is opened at startup and shared behind a mutex; every
/// operation is a single statement executed under the lock, so no state
/// spans operations. Open failure is fatal - there is no retry.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the database file
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        MigrationService::new(&conn, MIGRATIONS).run_pending()?;
        Ok(())
    }

    /// Path of the underlying database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // === User operations ===

    /// Insert a new user row, assigning the id from seq_users
    ///
    /// Returns `None` when the username is already taken (UNIQUE violation);
    /// the existing row is left untouched. Any other failure is an error.
    pub fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let id: i64 = conn.query_row("SELECT nextval('seq_users')", [], |row| row.get(0))?;

        let inserted = conn.execute(
            "INSERT INTO sys_users (user_id, username, password_hash, email, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![id, username, password_hash, email, created_at.to_rfc3339()],
        );

        match inserted {
            Ok(_) => Ok(Some(User {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                email: email.map(|e| e.to_string()),
                created_at,
            })),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by exact username match
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, username, password_hash, email, created_at::VARCHAR
             FROM sys_users WHERE username = ?",
        )?;

        let user = stmt
            .query_row(params![username], |row| Ok(row_to_user(row)))
            .ok();

        Ok(user)
    }

    pub fn get_user_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_users", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Transaction operations ===

    /// Append a transaction row, assigning the id from seq_transactions
    pub fn insert_transaction(&self, tx: &Transaction) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let id: i64 =
            conn.query_row("SELECT nextval('seq_transactions')", [], |row| row.get(0))?;

        conn.execute(
            "INSERT INTO sys_transactions (transaction_id, user_id, amount, note, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                id,
                tx.user_id,
                tx.amount.to_string().parse::<f64>().unwrap_or(0.0),
                tx.note,
                tx.created_at.to_rfc3339(),
            ],
        )?;

        Ok(id)
    }

    /// Get all transactions for a user, most recent first
    pub fn get_transactions_by_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT transaction_id, user_id, amount, note, created_at::VARCHAR
             FROM sys_transactions
             WHERE user_id = ?
             ORDER BY created_at DESC, transaction_id DESC",
        )?;

        let transactions = stmt
            .query_map(params![user_id], |row| Ok(row_to_transaction(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(transactions)
    }

    pub fn get_transaction_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_transaction_date_range(&self) -> Result<DateRange> {
        let conn = self.conn.lock().unwrap();
        let result: (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(created_at)::VARCHAR, MAX(created_at)::VARCHAR FROM sys_transactions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(DateRange {
            earliest: result.0,
            latest: result.1,
        })
    }
}

fn row_to_user(row: &duckdb::Row) -> User {
    // Column indices from SELECT:
    // 0: user_id, 1: username, 2: password_hash, 3: email, 4: created_at
    let created_str: String = row.get(4).unwrap_or_default();

    User {
        id: row.get(0).unwrap_or_default(),
        username: row.get(1).unwrap_or_default(),
        password_hash: row.get(2).unwrap_or_default(),
        email: row.get::<_, Option<String>>(3).ok().flatten(),
        created_at: parse_timestamp(&created_str),
    }
}

fn row_to_transaction(row: &duckdb::Row) -> Transaction {
    // Column indices from SELECT:
    // 0: transaction_id, 1: user_id, 2: amount, 3: note, 4: created_at
    let amount: f64 = row.get(2).unwrap_or(0.0);
    let created_str: String = row.get(4).unwrap_or_default();

    Transaction {
        id: row.get(0).unwrap_or_default(),
        user_id: row.get(1).unwrap_or_default(),
        amount: Decimal::try_from(amount).unwrap_or_default(),
        note: row.get(3).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
    }
}

/// Parse the timestamp strings DuckDB hands back
///
/// Values are written as RFC 3339; the VARCHAR cast returns either that form
/// or DuckDB's space-separated rendering, depending on how the value was
/// normalized on insert.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
        .unwrap_or_else(|_| Utc::now())
}
