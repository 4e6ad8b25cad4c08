//! In-memory trust module simulator
//!
//! A stateful software stand-in for a real module and its driver stack,
//! implementing the command port honestly: handles are allocated in the
//! module's session/transient ranges, startup is accepted once, nonces are
//! length-checked, flushes are accounted, and teardown order is logged.
//! Per-command fault injection drives the failure-path tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::RngCore;
use tracing::debug;

use crate::error::ConnectError;
use crate::model::{
    AuthCredential, AuthValue, CreatedKey, HashAlg, Hierarchy, KeyTemplate, ModuleHandle,
    PublicKeyInfo, ReturnCode, SessionAttributes, SessionKind, StartupKind,
};
use crate::ports::{CommandResult, Connector, RcDecoder, TpmCommands};

// Return codes the simulator's translation table knows.
const RC_INITIALIZE: u32 = 0x0100;
const RC_FAILURE: u32 = 0x0101;
const RC_VALUE: u32 = 0x0184;
const RC_HANDLE: u32 = 0x018b;
const RC_SIZE: u32 = 0x0195;

/// Shortest caller nonce the simulated module accepts.
const MIN_NONCE_LEN: usize = 16;
/// Largest randomness request served in one command.
const MAX_RANDOM: usize = 32;

const SESSION_HANDLE_BASE: u32 = 0x0200_0000;
const TRANSIENT_HANDLE_BASE: u32 = 0x8000_0000;

/// Commands a fault can be injected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Startup,
    SetAuth,
    GetRandom,
    StartAuthSession,
    SetSessionAttributes,
    CreatePrimary,
    FlushContext,
}

#[derive(Debug, Clone)]
enum SimObject {
    HmacSession { attributes: SessionAttributes },
    PrimaryKey,
}

#[derive(Debug, Default)]
struct SimState {
    started: bool,
    transport_open: bool,
    fail_session_init: bool,
    injected: HashMap<CommandKind, ReturnCode>,
    objects: HashMap<u32, SimObject>,
    hierarchy_auth: HashMap<Hierarchy, AuthValue>,
    next_session: u32,
    next_transient: u32,
    flush_log: Vec<ModuleHandle>,
    teardown_log: Vec<&'static str>,
    last_random_request: Option<usize>,
}

impl SimState {
    fn take_injected(&mut self, kind: CommandKind) -> CommandResult<()> {
        match self.injected.remove(&kind) {
            Some(rc) => Err(rc),
            None => Ok(()),
        }
    }

    fn alloc_session(&mut self) -> ModuleHandle {
        let raw = SESSION_HANDLE_BASE + self.next_session;
        self.next_session += 1;
        ModuleHandle::from_raw(raw)
    }

    fn alloc_transient(&mut self) -> ModuleHandle {
        let raw = TRANSIENT_HANDLE_BASE + self.next_transient;
        self.next_transient += 1;
        ModuleHandle::from_raw(raw)
    }
}

/// Connector to the simulated module.
///
/// Accepted configuration strings: `sim`, `sim:<label>`, `device:<path>`.
/// State is shared with every transport/session handed out, so tests can
/// inspect handle accounting after a run.
#[derive(Debug, Clone)]
pub struct SimConnector {
    state: Arc<Mutex<SimState>>,
}

impl SimConnector {
    /// A module the platform has already started; the pipeline's own
    /// startup call will be answered with "already initialized". This is
    /// the common situation behind an in-kernel resource manager.
    pub fn new() -> Self {
        let connector = Self::pristine();
        connector.lock().started = true;
        connector
    }

    /// A module that has not seen a startup signal since power-on.
    pub fn pristine() -> Self {
        SimConnector {
            state: Arc::new(Mutex::new(SimState::default())),
        }
    }

    /// Answer `kind` with `rc` the next time it is issued.
    pub fn fail_command(&self, kind: CommandKind, rc: ReturnCode) {
        self.lock().injected.insert(kind, rc);
    }

    /// Make the next `init_session` fail after the transport opened.
    pub fn fail_session_init(&self) {
        self.lock().fail_session_init = true;
    }

    /// Open the transport and session context in one go.
    pub fn connect(&self, config: &str) -> Result<SimTpm, ConnectError> {
        let transport = self.open_transport(config)?;
        self.init_session(transport)
    }

    /// Handles currently allocated inside the module.
    pub fn open_handles(&self) -> Vec<ModuleHandle> {
        let mut handles: Vec<ModuleHandle> = self
            .lock()
            .objects
            .keys()
            .map(|raw| ModuleHandle::from_raw(*raw))
            .collect();
        handles.sort_by_key(|h| h.as_raw());
        handles
    }

    /// Flushed handles, in flush order.
    pub fn flush_log(&self) -> Vec<ModuleHandle> {
        self.lock().flush_log.clone()
    }

    /// Finalization order of the session context and transport.
    pub fn teardown_log(&self) -> Vec<&'static str> {
        self.lock().teardown_log.clone()
    }

    /// Byte count of the most recent randomness request, if any.
    pub fn last_random_request(&self) -> Option<usize> {
        self.lock().last_random_request
    }

    /// Attribute bits of an open session, if `handle` is one.
    pub fn session_attributes(&self, handle: ModuleHandle) -> Option<SessionAttributes> {
        match self.lock().objects.get(&handle.as_raw()) {
            Some(SimObject::HmacSession { attributes }) => Some(*attributes),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().expect("simulator state poisoned")
    }
}

impl Default for SimConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SimConnector {
    type Transport = SimTransport;
    type Session = SimTpm;

    fn open_transport(&self, config: &str) -> Result<SimTransport, ConnectError> {
        let recognized =
            config == "sim" || config.starts_with("sim:") || config.starts_with("device:");
        if !recognized {
            return Err(ConnectError::TransportOpen {
                config: config.to_string(),
                reason: "unrecognized transport configuration".to_string(),
            });
        }

        self.lock().transport_open = true;
        debug!("simulator transport opened ({config})");
        Ok(SimTransport {
            state: Arc::clone(&self.state),
        })
    }

    fn init_session(&self, transport: SimTransport) -> Result<SimTpm, ConnectError> {
        if self.lock().fail_session_init {
            // `transport` is consumed and finalized by drop before we return.
            return Err(ConnectError::SessionInit {
                reason: "simulated session context failure".to_string(),
            });
        }

        debug!("simulator session context initialized");
        Ok(SimTpm {
            state: Arc::clone(&self.state),
            _transport: transport,
        })
    }
}

/// Guard for the simulated low-level channel.
#[derive(Debug)]
pub struct SimTransport {
    state: Arc<Mutex<SimState>>,
}

impl Drop for SimTransport {
    fn drop(&mut self) {
        let mut state = self.state.lock().expect("simulator state poisoned");
        state.transport_open = false;
        state.teardown_log.push("transport");
        debug!("simulator transport finalized");
    }
}

/// The simulated session context; owns its transport so drop order tears
/// the session context down strictly before the transport.
#[derive(Debug)]
pub struct SimTpm {
    state: Arc<Mutex<SimState>>,
    _transport: SimTransport,
}

impl SimTpm {
    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().expect("simulator state poisoned")
    }
}

impl Drop for SimTpm {
    fn drop(&mut self) {
        self.lock().teardown_log.push("session-context");
        debug!("simulator session context finalized");
    }
}

impl RcDecoder for SimTpm {
    fn decode_rc(&self, rc: ReturnCode) -> Option<String> {
        let reason = match rc.as_raw() {
            RC_INITIALIZE => "TPM_RC_INITIALIZE (module already initialized)",
            RC_FAILURE => "TPM_RC_FAILURE (commands not being accepted)",
            RC_VALUE => "TPM_RC_VALUE (value is out of range or incorrect)",
            RC_HANDLE => "TPM_RC_HANDLE (handle is not associated with an object)",
            RC_SIZE => "TPM_RC_SIZE (structure is the wrong size)",
            _ => return None,
        };
        Some(reason.to_string())
    }
}

impl TpmCommands for SimTpm {
    fn startup(&mut self, _kind: StartupKind) -> CommandResult<()> {
        let mut state = self.lock();
        state.take_injected(CommandKind::Startup)?;
        if state.started {
            return Err(ReturnCode::from_raw(RC_INITIALIZE));
        }
        state.started = true;
        Ok(())
    }

    fn set_auth(&mut self, hierarchy: Hierarchy, auth: &AuthValue) -> CommandResult<()> {
        let mut state = self.lock();
        state.take_injected(CommandKind::SetAuth)?;
        state.hierarchy_auth.insert(hierarchy, auth.clone());
        Ok(())
    }

    fn get_random(&mut self, count: usize) -> CommandResult<Vec<u8>> {
        let mut state = self.lock();
        state.take_injected(CommandKind::GetRandom)?;
        state.last_random_request = Some(count);

        // A real module caps a single reply at its largest digest size.
        let mut bytes = vec![0u8; count.min(MAX_RANDOM)];
        rand::rng().fill_bytes(&mut bytes);
        Ok(bytes)
    }

    fn start_auth_session(
        &mut self,
        nonce_caller: &[u8],
        _kind: SessionKind,
        _auth_hash: HashAlg,
    ) -> CommandResult<ModuleHandle> {
        let mut state = self.lock();
        state.take_injected(CommandKind::StartAuthSession)?;
        if nonce_caller.len() < MIN_NONCE_LEN {
            return Err(ReturnCode::from_raw(RC_SIZE));
        }

        let handle = state.alloc_session();
        state.objects.insert(
            handle.as_raw(),
            SimObject::HmacSession {
                attributes: SessionAttributes::default(),
            },
        );
        Ok(handle)
    }

    fn set_session_attributes(
        &mut self,
        session: ModuleHandle,
        attributes: SessionAttributes,
    ) -> CommandResult<()> {
        let mut state = self.lock();
        state.take_injected(CommandKind::SetSessionAttributes)?;
        match state.objects.get_mut(&session.as_raw()) {
            Some(SimObject::HmacSession { attributes: slot }) => {
                *slot = attributes;
                Ok(())
            }
            _ => Err(ReturnCode::from_raw(RC_HANDLE)),
        }
    }

    fn create_primary(
        &mut self,
        hierarchy: Hierarchy,
        auth: &AuthCredential,
        template: &KeyTemplate,
    ) -> CommandResult<CreatedKey> {
        let mut state = self.lock();
        state.take_injected(CommandKind::CreatePrimary)?;

        if template.validate().is_err() {
            return Err(ReturnCode::from_raw(RC_VALUE));
        }
        match auth {
            AuthCredential::Password => {
                // An absent hierarchy auth equals the empty auth value.
                let matches = state
                    .hierarchy_auth
                    .get(&hierarchy)
                    .map(AuthValue::is_empty)
                    .unwrap_or(true);
                if !matches {
                    return Err(ReturnCode::from_raw(RC_VALUE));
                }
            }
            AuthCredential::Session(handle) => {
                match state.objects.get(&handle.as_raw()) {
                    Some(SimObject::HmacSession { .. }) => {}
                    _ => return Err(ReturnCode::from_raw(RC_VALUE)),
                }
            }
        }

        let handle = state.alloc_transient();
        state.objects.insert(handle.as_raw(), SimObject::PrimaryKey);
        Ok(CreatedKey {
            handle,
            public: PublicKeyInfo {
                algorithm: template.algorithm,
                name_alg: template.name_alg,
                attributes: template.attributes,
                key_bits: template.key_bits,
                exponent: template.exponent,
            },
        })
    }

    fn flush_context(&mut self, handle: ModuleHandle) -> CommandResult<()> {
        let mut state = self.lock();
        state.take_injected(CommandKind::FlushContext)?;
        if state.objects.remove(&handle.as_raw()).is_none() {
            return Err(ReturnCode::from_raw(RC_HANDLE));
        }
        state.flush_log.push(handle);
        Ok(())
    }
}
