//! Use cases (orchestration)
//!
//! This module contains use cases that orchestrate operations across the
//! ports: the individual pipeline stages and the driver that sequences
//! them and guarantees cleanup.

mod cleanup;
mod create_primary;
mod establish_session;
mod provision;
mod startup;

pub use cleanup::{flush_all, AcquiredHandles};
pub use create_primary::create_primary;
pub use establish_session::{establish_session, NONCE_LEN};
pub use provision::{
    provision_primary, AuthMode, ProvisionConfig, ProvisionReport, DEFAULT_TRANSPORT_CONFIG,
    TRANSPORT_CONFIG_ENV,
};
pub use startup::startup;
