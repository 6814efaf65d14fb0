//! JSON I/O for the CLI
//!
//! - input: one JSON object per line on stdin
//! - output: one JSON object per line on stdout, `{"status":"ok","data":...}`
//!   or `{"status":"error","code":...,"message":...}`

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a single JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(&line)?)
}

/// Iterate JSON requests from stdin until EOF; blank lines are skipped
pub fn read_requests() -> impl Iterator<Item = CliResult<Value>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|line| {
            let line = line?;
            serde_json::from_str(&line).map_err(CliError::from)
        })
}

pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&json!({"status": "ok", "data": data}))
}

pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&json!({"status": "error", "code": code, "message": message}))
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
