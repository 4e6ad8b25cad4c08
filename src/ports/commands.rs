//! TpmCommands trait - the narrow command interface to the trust module
//!
//! One method per module command this core issues. Out-parameters of the
//! underlying driver stack are re-expressed as result values: `Ok` carries
//! the created handle or data, `Err` carries the raw non-success return
//! code for the single check routine to translate.

use crate::model::{
    AuthCredential, AuthValue, CreatedKey, HashAlg, Hierarchy, KeyTemplate, ModuleHandle,
    ReturnCode, SessionAttributes, SessionKind, StartupKind,
};

/// Outcome of a single module command.
pub type CommandResult<T> = Result<T, ReturnCode>;

/// Access to the driver stack's return-code translation table.
///
/// The table itself is opaque to this core; the only operation is the
/// lookup of a decoded reason for a non-success code.
pub trait RcDecoder {
    /// Decoded human-readable reason for `rc`, if the table knows it.
    fn decode_rc(&self, rc: ReturnCode) -> Option<String>;
}

/// Capability to issue commands to the trust module.
///
/// Implementors own an established protocol-level session context; every
/// command is issued through it, blocking, one at a time. Handles returned
/// by `start_auth_session` and `create_primary` are real module resources
/// the caller must flush before the implementor is dropped.
pub trait TpmCommands: RcDecoder {
    /// Signal the module it may initialize volatile state.
    fn startup(&mut self, kind: StartupKind) -> CommandResult<()>;

    /// Set the authorization value for a hierarchy.
    fn set_auth(&mut self, hierarchy: Hierarchy, auth: &AuthValue) -> CommandResult<()>;

    /// Request `count` bytes from the module's own randomness source.
    fn get_random(&mut self, count: usize) -> CommandResult<Vec<u8>>;

    /// Open an authorization session with the caller-supplied nonce.
    ///
    /// No parameter-encryption symmetric algorithm is selected; the module
    /// contributes its own nonce in the underlying exchange.
    fn start_auth_session(
        &mut self,
        nonce_caller: &[u8],
        kind: SessionKind,
        auth_hash: HashAlg,
    ) -> CommandResult<ModuleHandle>;

    /// Configure the attribute bits of an open session.
    fn set_session_attributes(
        &mut self,
        session: ModuleHandle,
        attributes: SessionAttributes,
    ) -> CommandResult<()>;

    /// Create a primary key under `hierarchy`.
    ///
    /// Sensitive-creation data is always empty (the module generates all
    /// sensitive material internally) and no outside-info or PCR selection
    /// is bound.
    fn create_primary(
        &mut self,
        hierarchy: Hierarchy,
        auth: &AuthCredential,
        template: &KeyTemplate,
    ) -> CommandResult<CreatedKey>;

    /// Release a handle previously returned by this session context.
    fn flush_context(&mut self, handle: ModuleHandle) -> CommandResult<()>;
}
