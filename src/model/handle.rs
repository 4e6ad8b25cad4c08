//! Opaque handles to objects living inside the trust module

use std::fmt;

/// Handle to a transient or persistent object inside the trust module.
///
/// This is an opaque reference returned by the command that allocated the
/// object (session open, key creation). The value has no meaning outside
/// the session context that produced it. Each acquired handle must be
/// flushed exactly once before the owning session context is torn down,
/// or it leaks module-internal memory until module reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleHandle(u32);

impl ModuleHandle {
    /// Wrap a raw handle value obtained from the module.
    ///
    /// Only adapters should call this, with values the module itself
    /// returned.
    pub const fn from_raw(value: u32) -> Self {
        ModuleHandle(value)
    }

    /// Raw handle value, for passing to driver-stack APIs.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
