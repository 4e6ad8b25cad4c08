//! Error types for the tpmprov library
//!
//! This module defines the error hierarchy for all provisioning operations.
//! Errors are organized per pipeline stage and use thiserror for
//! implementation. The startup stage is deliberately absent: its failure is
//! advisory and surfaces as a Reporter warning, never as an error value.

use thiserror::Error;

use crate::model::{ModuleHandle, ReturnCode, TemplateError};

/// Result type alias for provisioning operations
pub type TpmProvResult<T> = Result<T, TpmProvError>;

/// Top-level error type for all provisioning operations
#[derive(Error, Debug)]
pub enum TpmProvError {
    /// Transport or session-context initialization failed
    #[error("connection error: {0}")]
    Connect(#[from] ConnectError),

    /// Authenticated session establishment failed
    #[error("session establishment error: {0}")]
    Session(#[from] SessionEstablishError),

    /// Primary key creation failed
    #[error("key provisioning error: {0}")]
    KeyCreation(#[from] KeyCreationError),

    /// One or more acquired handles could not be flushed
    #[error("cleanup error: {0}")]
    Flush(#[from] FlushError),
}

/// A single module command that answered with a non-success return code,
/// together with the driver stack's decoded reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{what}: {reason} (rc {rc})")]
pub struct CommandFailure {
    /// Which command failed, named by the call site
    pub what: String,
    /// The raw return code
    pub rc: ReturnCode,
    /// Decoded reason, or the unknown placeholder
    pub reason: String,
}

/// Transport/session-context initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The transport channel could not be opened
    #[error("failed to open transport \"{config}\": {reason}")]
    TransportOpen { config: String, reason: String },

    /// The protocol-level session context could not be initialized
    #[error("failed to initialize session context: {reason}")]
    SessionInit { reason: String },
}

/// Authenticated session establishment errors, one per step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionEstablishError {
    /// Clearing the hierarchy authorization failed
    #[error("set hierarchy auth: {0}")]
    SetAuth(CommandFailure),

    /// The module's randomness source refused the nonce request
    #[error("nonce acquisition: {0}")]
    NonceAcquisition(CommandFailure),

    /// Opening the HMAC session failed
    #[error("session open: {0}")]
    SessionOpen(CommandFailure),

    /// Marking the session as continuing failed; the opened session handle
    /// is still a real module resource and gets flushed by cleanup
    #[error("session attributes: {0}")]
    Attributes(CommandFailure),
}

/// Primary key creation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyCreationError {
    /// The key template is internally inconsistent
    #[error("invalid key template: {0}")]
    Template(#[from] TemplateError),

    /// Clearing the hierarchy authorization failed
    #[error("set hierarchy auth: {0}")]
    SetAuth(CommandFailure),

    /// The creation command itself failed; no handle was allocated
    #[error("create primary: {0}")]
    Create(CommandFailure),
}

/// Accumulated flush failures from the best-effort cleanup pass.
///
/// Cleanup never stops at the first failed flush; every acquired handle is
/// attempted and every failure is recorded here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct FlushError {
    pub failures: Vec<(&'static str, ModuleHandle, CommandFailure)>,
}

impl std::fmt::Display for FlushError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to flush {} handle(s):", self.failures.len())?;
        for (label, handle, failure) in &self.failures {
            write!(f, " [{} {}: {}]", label, handle, failure)?;
        }
        Ok(())
    }
}
