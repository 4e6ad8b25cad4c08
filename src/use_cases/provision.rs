//! Provisioning pipeline driver
//!
//! Strictly sequential: open transport, initialize the session context,
//! advisory startup, optionally establish an HMAC session, create the
//! primary key, flush everything acquired, then tear the session context
//! and transport down by drop. Any fatal stage short-circuits what follows
//! but cleanup of already-acquired handles always runs first.

use std::env;

use tracing::info;

use crate::error::{TpmProvError, TpmProvResult};
use crate::model::{
    AuthCredential, CreatedKey, Hierarchy, KeyTemplate, ModuleHandle, PublicKeyInfo,
};
use crate::ports::{Connector, Reporter, TpmCommands};
use crate::use_cases::{
    create_primary, establish_session, flush_all, startup, AcquiredHandles,
};

/// Environment-style override for the transport configuration.
pub const TRANSPORT_CONFIG_ENV: &str = "TPM_TCTI";
/// Platform default device path.
pub const DEFAULT_TRANSPORT_CONFIG: &str = "device:/dev/tpmrm0";

/// How the creation command is authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Empty password-style credential, no session.
    Password,
    /// An HMAC session established first, then used as the credential.
    HmacSession,
}

/// Everything the pipeline needs to run.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub transport_config: String,
    pub hierarchy: Hierarchy,
    pub auth_mode: AuthMode,
    pub template: KeyTemplate,
}

impl ProvisionConfig {
    pub fn new(transport_config: impl Into<String>) -> Self {
        ProvisionConfig {
            transport_config: transport_config.into(),
            hierarchy: Hierarchy::default_storage(),
            auth_mode: AuthMode::HmacSession,
            template: KeyTemplate::storage_primary(),
        }
    }

    /// Configuration from the environment override, else the platform
    /// default device path.
    pub fn from_env() -> Self {
        let config =
            env::var(TRANSPORT_CONFIG_ENV).unwrap_or_else(|_| DEFAULT_TRANSPORT_CONFIG.to_string());
        Self::new(config)
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Whether the module accepted our startup signal (advisory).
    pub startup_ok: bool,
    /// The HMAC session handle, when one was established. Already flushed.
    pub session: Option<ModuleHandle>,
    /// The created primary key handle. Already flushed.
    pub key: ModuleHandle,
    /// Descriptive public-area fields of the created key.
    pub public: PublicKeyInfo,
    /// Number of handles flushed during cleanup.
    pub flushed: usize,
}

/// Run the whole provisioning pipeline.
///
/// # Errors
///
/// The first fatal stage error, after cleanup of everything acquired up to
/// that point. A run whose stages all succeeded but whose cleanup did not
/// is surfaced as `TpmProvError::Flush`, never hidden.
pub fn provision_primary<C, R>(
    connector: &C,
    ui: &mut R,
    config: &ProvisionConfig,
) -> TpmProvResult<ProvisionReport>
where
    C: Connector,
    R: Reporter,
{
    ui.step("connect to module");
    ui.kv("transport", &config.transport_config);

    let transport = match connector.open_transport(&config.transport_config) {
        Ok(transport) => {
            ui.success("transport opened");
            transport
        }
        Err(e) => {
            ui.fail(&e.to_string());
            return Err(e.into());
        }
    };
    let mut tpm = match connector.init_session(transport) {
        Ok(session) => {
            ui.success("session context initialized");
            session
        }
        Err(e) => {
            ui.fail(&e.to_string());
            return Err(e.into());
        }
    };

    let mut acquired = AcquiredHandles::new();
    let outcome = run_stages(&mut tpm, ui, config, &mut acquired);

    ui.step("cleanup (flush acquired handles)");
    let cleanup = flush_all(&mut tpm, ui, &mut acquired);

    let (startup_ok, session, created) = outcome?;
    let flushed = cleanup.map_err(TpmProvError::Flush)?;
    info!("provisioning pipeline completed, {flushed} handle(s) flushed");

    Ok(ProvisionReport {
        startup_ok,
        session,
        key: created.handle,
        public: created.public,
        flushed,
    })
}

/// The fatal stages between connect and cleanup.
fn run_stages<T, R>(
    tpm: &mut T,
    ui: &mut R,
    config: &ProvisionConfig,
    acquired: &mut AcquiredHandles,
) -> TpmProvResult<(bool, Option<ModuleHandle>, CreatedKey)>
where
    T: TpmCommands,
    R: Reporter,
{
    ui.step("module startup (optional)");
    let startup_ok = startup(tpm, ui);

    let (session, auth) = match config.auth_mode {
        AuthMode::Password => (None, AuthCredential::Password),
        AuthMode::HmacSession => {
            ui.step("establish HMAC session");
            let session = establish_session(tpm, ui, config.hierarchy, acquired)?;
            (Some(session), AuthCredential::Session(session))
        }
    };

    ui.step("create primary key");
    let created = create_primary(tpm, ui, config.hierarchy, &auth, &config.template, acquired)?;

    Ok((startup_ok, session, created))
}
