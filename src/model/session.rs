//! Session parameters: session kinds, authorization hash, attribute bits

use std::fmt;

/// Kind of authorization session the module can open.
///
/// This core opens exactly one kind (HMAC-authorized); the others exist so
/// the command interface can express the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// HMAC-authorized session.
    Hmac,
    /// Policy-authorized session.
    Policy,
    /// Trial policy session (computes a policy digest, authorizes nothing).
    Trial,
}

/// Hash algorithm used for session authorization and object naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    Sha256,
    Sha384,
    Sha512,
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlg::Sha256 => "SHA256",
            HashAlg::Sha384 => "SHA384",
            HashAlg::Sha512 => "SHA512",
        };
        f.write_str(name)
    }
}

/// Session attribute bits this design can express.
///
/// A freshly opened session has no bits set; the establisher marks the
/// session as continuing so it survives across subsequent commands instead
/// of being single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionAttributes {
    /// Session stays open after the next command.
    pub continue_session: bool,
    /// Session is used for command auditing.
    pub audit: bool,
    /// Session encrypts the first response parameter.
    pub encrypt: bool,
    /// Session decrypts the first command parameter.
    pub decrypt: bool,
}

impl SessionAttributes {
    /// Only the continue bit set, nothing else.
    pub fn continuing() -> Self {
        SessionAttributes {
            continue_session: true,
            ..SessionAttributes::default()
        }
    }

    /// True iff no attribute bit is set.
    pub fn is_empty(&self) -> bool {
        *self == SessionAttributes::default()
    }
}

impl fmt::Display for SessionAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = [
            (self.continue_session, "continueSession"),
            (self.audit, "audit"),
            (self.encrypt, "encrypt"),
            (self.decrypt, "decrypt"),
        ];
        let mut first = true;
        for (set, name) in bits {
            if set {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("(none)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuing_sets_only_continue_bit() {
        let attrs = SessionAttributes::continuing();
        assert!(attrs.continue_session);
        assert!(!attrs.audit);
        assert!(!attrs.encrypt);
        assert!(!attrs.decrypt);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SessionAttributes::default().is_empty());
        assert!(!SessionAttributes::continuing().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionAttributes::continuing().to_string(), "continueSession");
        assert_eq!(SessionAttributes::default().to_string(), "(none)");
    }
}
