//! Observability
//!
//! - structured JSON logging with a configurable minimum severity
//! - typed events, each with a fixed severity
//! - atomic counters per backend
//!
//! Observability is read-only: nothing here changes evaluation results, and
//! a failed log write is dropped silently.
//!
//! ```ignore
//! use qqq::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::QueryExecuted, &[("table", "person"), ("returned", "3")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event at its own severity, with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // only checks that logging does not panic
        log_event(Event::MetadataLoaded);
        log_event_with_fields(Event::QueryExecuted, &[("table", "person")]);
    }
}
