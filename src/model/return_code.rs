//! Module return codes
//!
//! Every command issued to the trust module answers with a return code.
//! A single distinguished value means the command fully completed; every
//! other value is decoded into a textual reason by the driver stack's
//! translation table (see `ports::RcDecoder`).

use std::fmt;

/// Status value returned by the trust module for a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnCode(u32);

impl ReturnCode {
    /// The distinguished success value.
    pub const SUCCESS: ReturnCode = ReturnCode(0);

    /// Wrap a raw status value received from the driver stack.
    pub const fn from_raw(value: u32) -> Self {
        ReturnCode(value)
    }

    /// Raw status value, for passing back to driver-stack APIs.
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// True iff this is the distinguished success value.
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_success() {
        assert!(ReturnCode::SUCCESS.is_success());
        assert!(!ReturnCode::from_raw(0x100).is_success());
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(ReturnCode::from_raw(0x100).to_string(), "0x00000100");
        assert_eq!(ReturnCode::SUCCESS.to_string(), "0x00000000");
    }

    #[test]
    fn test_raw_roundtrip() {
        assert_eq!(ReturnCode::from_raw(0x9a2).as_raw(), 0x9a2);
    }
}
