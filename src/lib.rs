//! qqq - filter evaluation and record security for the QQQ record layer
//!
//! - `record`: typed field values and records
//! - `filter`: criteria, boolean filter trees, sorting and paging
//! - `security`: record lock trees, null-value behaviors, field locks
//! - `instance`: table and security key type metadata
//! - `backend`: an in-memory store that enforces security per session
//! - `observability`: structured logging and counters
//! - `cli`: JSON-over-stdio front end

pub mod backend;
pub mod cli;
pub mod filter;
pub mod instance;
pub mod observability;
pub mod record;
pub mod security;
