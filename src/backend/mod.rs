//! Record backend
//!
//! Runs queries, counts and writes for one instance, enforcing record and
//! field security for the session passed to each call.

mod config;
mod errors;
mod memory;
mod request;

pub use config::BackendConfig;
pub use errors::{BackendError, BackendResult};
pub use memory::MemoryBackend;
pub use request::{QueryInput, QueryOutput};
