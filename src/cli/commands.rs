//! CLI command implementations
//!
//! Boot sequence, shared by every command:
//! 1. load the config file
//! 2. route every log line to stderr, since stdout carries the responses
//! 3. apply the configured minimum log severity
//! 4. load and validate instance metadata
//! 5. create the backend and seed it from the data directory, if any

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::backend::{BackendConfig, MemoryBackend, QueryInput};
use crate::filter::QueryFilter;
use crate::instance::{Instance, InstanceLoader};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::record::{Record, Value};
use crate::security::Session;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `tables/` and `security_key_types/`
    pub metadata_dir: String,

    /// Directory holding `<table>.json` record arrays to seed from
    #[serde(default)]
    pub data_dir: Option<String>,

    #[serde(flatten)]
    pub backend: BackendConfig,
}

impl Config {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.metadata_dir.is_empty() {
            return Err(CliError::config_error("metadata_dir must not be empty"));
        }
        self.backend
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))
    }

    pub fn metadata_path(&self) -> &Path {
        Path::new(&self.metadata_dir)
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_dir.as_deref().map(Path::new)
    }
}

/// Operations accepted on stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Query,
    Count,
    Insert,
    Update,
    Delete,
}

/// One stdin request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Required by `start`; `query` and `count` supply their own
    #[serde(default)]
    pub op: Option<Operation>,
    pub table_name: String,
    #[serde(default)]
    pub filter: QueryFilter,
    /// Record bodies for insert and update
    #[serde(default)]
    pub records: Vec<JsonValue>,
    /// Keys for delete
    #[serde(default)]
    pub primary_keys: Vec<Value>,
    #[serde(default)]
    pub session: Session,
}

impl Request {
    fn query_input(&self) -> QueryInput {
        QueryInput::new(&self.table_name).with_filter(self.filter.clone())
    }

    fn records(&self) -> CliResult<Vec<Record>> {
        self.records
            .iter()
            .map(|body| {
                Record::from_json(&self.table_name, body)
                    .ok_or_else(|| CliError::invalid_request(format!("record is not a JSON object: {}", body)))
            })
            .collect()
    }
}

/// Main CLI entry point, called from main.rs
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { config } => validate(&config),
        Command::Query { config } => query(&config),
        Command::Count { config } => count(&config),
        Command::Start { config } => start(&config),
    }
}

/// Loads and validates metadata, reporting what was found
pub fn validate(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let instance = InstanceLoader::new(config.metadata_path()).load()?;

    write_response(json!({
        "tables": instance.tables().map(|t| t.name.clone()).collect::<Vec<_>>(),
        "securityKeyTypes": instance.security_key_types().map(|k| k.name.clone()).collect::<Vec<_>>(),
    }))
}

/// Runs the query read from stdin; any `op` is overridden
pub fn query(config_path: &Path) -> CliResult<()> {
    let backend = boot(config_path)?;
    let mut request = parse_request(read_request()?)?;
    request.op = Some(Operation::Query);
    respond(&backend, &request)
}

/// Runs the count read from stdin; any `op` is overridden
pub fn count(config_path: &Path) -> CliResult<()> {
    let backend = boot(config_path)?;
    let mut request = parse_request(read_request()?)?;
    request.op = Some(Operation::Count);
    respond(&backend, &request)
}

/// Serves stdin requests until EOF.
///
/// A failed request gets an error line and serving continues; a stdin read
/// failure ends the loop.
pub fn start(config_path: &Path) -> CliResult<()> {
    let backend = boot(config_path)?;

    for request in read_requests() {
        match request {
            Ok(request) => match parse_request(request) {
                Ok(request) => respond(&backend, &request)?,
                Err(e) => write_error(e.code(), &e.to_string())?,
            },
            Err(e) => {
                write_error(e.code(), &e.to_string())?;
                break;
            }
        }
    }

    Ok(())
}

/// Executes one request against the backend
pub fn handle_request(backend: &MemoryBackend, request: &Request) -> CliResult<JsonValue> {
    let session = &request.session;
    let op = request
        .op
        .ok_or_else(|| CliError::invalid_request("missing field `op`"))?;
    let data = match op {
        Operation::Query => {
            let output = backend.query(&request.query_input(), session)?;
            json!({
                "records": output.records.iter().map(Record::to_json).collect::<Vec<_>>(),
                "scannedCount": output.scanned_count,
            })
        }
        Operation::Count => {
            json!({"count": backend.count(&request.query_input(), session)?})
        }
        Operation::Insert => {
            let inserted = backend.insert(&request.table_name, request.records()?, session)?;
            json!({"records": inserted.iter().map(Record::to_json).collect::<Vec<_>>()})
        }
        Operation::Update => {
            let updated = backend.update(&request.table_name, request.records()?, session)?;
            json!({"records": updated.iter().map(Record::to_json).collect::<Vec<_>>()})
        }
        Operation::Delete => {
            json!({"deletedCount": backend.delete(&request.table_name, &request.primary_keys, session)?})
        }
    };
    Ok(data)
}

fn respond(backend: &MemoryBackend, request: &Request) -> CliResult<()> {
    match handle_request(backend, request) {
        Ok(data) => write_response(data),
        Err(e) => write_error(e.code(), &e.to_string()),
    }
}

fn parse_request(request: JsonValue) -> CliResult<Request> {
    serde_json::from_value(request).map_err(|e| CliError::invalid_request(e.to_string()))
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    Logger::reserve_stdout();
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.backend.min_log_severity);

    let config_path_str = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("config", config_path_str.as_str())]);
    Ok(config)
}

fn boot(config_path: &Path) -> CliResult<MemoryBackend> {
    let config = load_config(config_path)?;
    let instance = InstanceLoader::new(config.metadata_path()).load()?;
    let data_files = match config.data_path() {
        Some(data_dir) => data_files(&instance, data_dir),
        None => Vec::new(),
    };

    let backend = MemoryBackend::new(instance, config.backend.clone())?;
    for (table_name, path) in data_files {
        backend.seed(&table_name, read_data_file(&table_name, &path)?)?;
    }

    Ok(backend)
}

/// `<data_dir>/<table>.json` for every table that has one
fn data_files(instance: &Instance, data_dir: &Path) -> Vec<(String, PathBuf)> {
    instance
        .tables()
        .map(|table| (table.name.clone(), data_dir.join(format!("{}.json", table.name))))
        .filter(|(_, path)| path.exists())
        .collect()
}

fn read_data_file(table_name: &str, path: &Path) -> CliResult<Vec<Record>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read {}: {}", path.display(), e)))?;

    let bodies: Vec<JsonValue> = serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid data file {}: {}", path.display(), e)))?;

    bodies
        .iter()
        .map(|body| {
            Record::from_json(table_name, body).ok_or_else(|| {
                CliError::config_error(format!("{} holds a non-object record", path.display()))
            })
        })
        .collect()
}
