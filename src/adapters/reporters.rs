//! Reporter adapters
//!
//! `TracingReporter` routes pipeline events into the `tracing` ecosystem
//! and is the default choice for library embedders. `RecordingReporter`
//! captures events in memory so tests (and embedders that render their own
//! output after the fact) can inspect what the pipeline emitted.

use tracing::{debug, error, info, warn};

use crate::ports::Reporter;

/// Reporter that forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn step(&mut self, title: &str) {
        info!("step: {title}");
    }

    fn success(&mut self, msg: &str) {
        info!("{msg}");
    }

    fn warn(&mut self, msg: &str) {
        warn!("{msg}");
    }

    fn fail(&mut self, msg: &str) {
        error!("{msg}");
    }

    fn kv(&mut self, key: &str, value: &str) {
        debug!("{key}: {value}");
    }
}

/// One captured reporter event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Step(String),
    Success(String),
    Warn(String),
    Fail(String),
    Kv(String, String),
}

/// Reporter that records events for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    pub fn steps(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Step(title) => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Warn(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Fail(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn step(&mut self, title: &str) {
        self.events.push(ReportEvent::Step(title.to_string()));
    }

    fn success(&mut self, msg: &str) {
        self.events.push(ReportEvent::Success(msg.to_string()));
    }

    fn warn(&mut self, msg: &str) {
        self.events.push(ReportEvent::Warn(msg.to_string()));
    }

    fn fail(&mut self, msg: &str) {
        self.events.push(ReportEvent::Fail(msg.to_string()));
    }

    fn kv(&mut self, key: &str, value: &str) {
        self.events
            .push(ReportEvent::Kv(key.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_captures_in_order() {
        let mut ui = RecordingReporter::default();
        ui.step("connect");
        ui.success("transport opened");
        ui.warn("startup returned: already initialized");
        ui.kv("transport", "sim");

        assert_eq!(ui.steps(), vec!["connect"]);
        assert_eq!(ui.warnings().len(), 1);
        assert!(ui.failures().is_empty());
        assert_eq!(ui.events().len(), 4);
    }
}
