//! A single-user banking simulation kept in plain files.
//!
//! Members live in `database.json` keyed by email, the member id counter in
//! `member_count.txt` and the transaction log in `records.csv`. Every
//! operation reads the file, changes it in memory and writes it back whole.

pub mod bank;
pub mod config;
pub mod error;
pub mod member;
pub mod record;
pub mod session;
pub mod store;
