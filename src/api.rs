//! High-level convenience API

use crate::adapters::{SimConnector, TracingReporter};
use crate::error::TpmProvResult;
use crate::ports::{Connector, Reporter};
use crate::use_cases::{provision_primary, ProvisionConfig, ProvisionReport};

/// Provision a storage primary key through `connector`, reporting through
/// `ui`, with the full configuration exposed.
pub fn provision_primary_key<C, R>(
    connector: &C,
    ui: &mut R,
    config: &ProvisionConfig,
) -> TpmProvResult<ProvisionReport>
where
    C: Connector,
    R: Reporter,
{
    provision_primary(connector, ui, config)
}

/// Provision a storage primary key against the in-memory simulator with
/// the environment-derived configuration, reporting through `tracing`.
pub fn provision_primary_key_sim() -> TpmProvResult<ProvisionReport> {
    let connector = SimConnector::new();
    let mut ui = TracingReporter;
    let mut config = ProvisionConfig::from_env();
    // The simulator ignores device paths' contents but the scheme must be
    // one it recognizes; plain "sim" always is.
    if !config.transport_config.starts_with("device:")
        && !config.transport_config.starts_with("sim")
    {
        config.transport_config = "sim".to_string();
    }
    provision_primary(&connector, &mut ui, &config)
}
