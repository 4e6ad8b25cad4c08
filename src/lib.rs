//! tpmprov - provisioning a primary key inside a hardware trust module
//!
//! The core of this crate is the orchestration/session-lifecycle layer: it
//! opens a transport to the module, initializes a protocol-level session
//! context, optionally signals module startup, establishes an
//! HMAC-authorized session, creates a restricted-decrypt RSA storage
//! primary key, and deterministically releases every acquired resource.
//! The module's wire protocol and cryptography stay behind the narrow
//! ports in [`ports`]; presentation and argument parsing stay outside the
//! core entirely.

pub mod adapters;
pub mod api;
pub mod error;
pub mod logic;
pub mod model;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use error::{
    CommandFailure, ConnectError, FlushError, KeyCreationError, SessionEstablishError,
    TpmProvError, TpmProvResult,
};
pub use model::{
    AuthCredential, CreatedKey, Hierarchy, KeyTemplate, ModuleHandle, PublicKeyInfo, ReturnCode,
};

// Re-export the public API
pub use api::{provision_primary_key, provision_primary_key_sim};
pub use use_cases::{AuthMode, ProvisionConfig, ProvisionReport};
