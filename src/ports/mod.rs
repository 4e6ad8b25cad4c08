//! Ports (algebras/traits) for trust-module operations
//!
//! These traits define the capabilities the provisioning core depends on.
//! They represent ports in hexagonal architecture - the core depends on
//! these abstractions, not concrete implementations.
//!
//! The command trait is driver-stack agnostic: it names the operations the
//! pipeline issues, not how a particular driver encodes them on the wire.

mod commands;
mod connector;
mod reporter;

pub mod contract_tests;

pub use commands::{CommandResult, RcDecoder, TpmCommands};
pub use connector::Connector;
pub use reporter::Reporter;
