//! Authorization values and credentials

use crate::model::ModuleHandle;

/// Authorization secret for a hierarchy or object.
///
/// The provisioning flow only ever sets empty authorization values (no
/// secret); the wrapper keeps the byte handling in one place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthValue(Vec<u8>);

impl AuthValue {
    /// The empty authorization value (no secret).
    pub fn empty() -> Self {
        AuthValue(Vec::new())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        AuthValue(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a privileged command is authorized.
///
/// Exactly one of the two forms is used per privileged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCredential {
    /// Password-style authorization with the (empty) auth value already
    /// set on the hierarchy; used when no session exists.
    Password,
    /// Authorization through an open HMAC session.
    Session(ModuleHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_auth_value() {
        let auth = AuthValue::empty();
        assert!(auth.is_empty());
        assert_eq!(auth.as_bytes(), &[] as &[u8]);
    }

    #[test]
    fn test_auth_value_from_bytes() {
        let auth = AuthValue::from_bytes(b"secret");
        assert!(!auth.is_empty());
        assert_eq!(auth.as_bytes(), b"secret");
    }
}
