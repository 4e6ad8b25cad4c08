//! Adapters - concrete implementations of ports (traits)
//!
//! The real-hardware binding for this domain would be a driver-stack
//! adapter (tss-esapi class) behind the same ports; this crate ships the
//! simulator and the reporter adapters.

mod reporters;
mod sim;

pub use reporters::{RecordingReporter, ReportEvent, TracingReporter};
pub use sim::{CommandKind, SimConnector, SimTpm, SimTransport};
