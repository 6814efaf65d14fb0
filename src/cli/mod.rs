//! Command-line front end
//!
//! - validate: load and check instance metadata
//! - query / count: one request from stdin
//! - start: a request per stdin line until EOF

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{count, handle_request, query, run, run_command, start, validate, Config, Operation, Request};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
