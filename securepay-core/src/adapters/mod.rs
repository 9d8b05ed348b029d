//! Adapter implementations
//!
//! Adapters bind the services to concrete technologies - here, DuckDB for
//! the relational store.

pub mod duckdb;
