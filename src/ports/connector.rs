//! Connector trait - two-phase acquisition of the channel to the module

use crate::error::ConnectError;
use crate::ports::TpmCommands;

/// Capability to reach a trust module: open the low-level transport, then
/// layer the protocol-level session context on top of it.
///
/// The session type owns the transport it was built from, so dropping the
/// session finalizes both, session context strictly before transport, each
/// exactly once, on every exit path. When `init_session` fails the
/// transport it consumed is finalized before the error returns.
pub trait Connector {
    /// Opaque guard for the low-level channel.
    type Transport;
    /// Protocol-level session context; all commands go through it.
    type Session: TpmCommands;

    /// Open the transport described by an opaque configuration string
    /// (a device path, a simulator address).
    fn open_transport(&self, config: &str) -> Result<Self::Transport, ConnectError>;

    /// Initialize the session context atop an open transport.
    fn init_session(&self, transport: Self::Transport) -> Result<Self::Session, ConnectError>;
}
