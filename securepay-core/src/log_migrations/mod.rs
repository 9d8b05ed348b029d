//! Log database migrations - embedded SQL files
//!
//! The operational log lives in its own database file (logs.duckdb) so that
//! log writes never contend with the main store. Same mechanism as
//! `crate::migrations`, separate history.

/// All migrations for the log database, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_log_schema.sql", include_str!("001_log_schema.sql")),
];
