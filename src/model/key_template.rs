//! Key templates for primary key creation
//!
//! A `KeyTemplate` is pure data: it is built once, validated, and consumed
//! by the provisioner. The fixed profile this crate provisions is a
//! restricted decrypt storage key (2048-bit RSA, SHA-256 name algorithm,
//! AES-128-CFB inner wrap, no signing scheme, default exponent).

use std::fmt;

use thiserror::Error;

use crate::model::{HashAlg, ModuleHandle};

/// Asymmetric algorithm family of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlg {
    Rsa,
    Ecc,
}

impl fmt::Display for KeyAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyAlg::Rsa => "RSA",
            KeyAlg::Ecc => "ECC",
        };
        f.write_str(name)
    }
}

/// Object attribute flags carried by a key's public area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectAttributes {
    /// Key never leaves this module.
    pub fixed_tpm: bool,
    /// Key cannot be re-parented.
    pub fixed_parent: bool,
    /// Sensitive portion is generated by the module itself.
    pub sensitive_data_origin: bool,
    /// Use is authorized with the key's own auth value.
    pub user_with_auth: bool,
    /// Key may only operate on module-internal data.
    pub restricted: bool,
    /// Key may decrypt.
    pub decrypt: bool,
    /// Key may sign.
    pub sign: bool,
}

impl fmt::Display for ObjectAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = [
            (self.fixed_tpm, "fixedTPM"),
            (self.fixed_parent, "fixedParent"),
            (self.sensitive_data_origin, "sensitiveDataOrigin"),
            (self.user_with_auth, "userWithAuth"),
            (self.restricted, "restricted"),
            (self.decrypt, "decrypt"),
            (self.sign, "sign"),
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

/// Symmetric algorithm of an inner wrapping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetricAlg {
    Aes,
}

/// Block mode of an inner wrapping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetricMode {
    Cfb,
    Cbc,
}

/// Inner symmetric wrapping scheme, required for restricted decrypt keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetricDef {
    pub algorithm: SymmetricAlg,
    pub key_bits: u16,
    pub mode: SymmetricMode,
}

impl SymmetricDef {
    /// The wrap scheme used by the fixed storage-key profile.
    pub fn aes_128_cfb() -> Self {
        SymmetricDef {
            algorithm: SymmetricAlg::Aes,
            key_bits: 128,
            mode: SymmetricMode::Cfb,
        }
    }
}

impl fmt::Display for SymmetricDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alg = match self.algorithm {
            SymmetricAlg::Aes => "AES",
        };
        let mode = match self.mode {
            SymmetricMode::Cfb => "CFB",
            SymmetricMode::Cbc => "CBC",
        };
        write!(f, "{}-{}-{}", alg, self.key_bits, mode)
    }
}

/// Requested shape of a primary key.
///
/// Never mutated after construction; consumed once by the provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    pub algorithm: KeyAlg,
    pub name_alg: HashAlg,
    pub attributes: ObjectAttributes,
    /// Inner wrap; mandatory when the key is restricted and decrypt-capable.
    pub symmetric: Option<SymmetricDef>,
    pub key_bits: u16,
    /// Public exponent; zero means the module default.
    pub exponent: u32,
}

impl KeyTemplate {
    /// The fixed restricted-decrypt storage primary profile.
    pub fn storage_primary() -> Self {
        KeyTemplate {
            algorithm: KeyAlg::Rsa,
            name_alg: HashAlg::Sha256,
            attributes: ObjectAttributes {
                fixed_tpm: true,
                fixed_parent: true,
                sensitive_data_origin: true,
                user_with_auth: true,
                restricted: true,
                decrypt: true,
                sign: false,
            },
            symmetric: Some(SymmetricDef::aes_128_cfb()),
            key_bits: 2048,
            exponent: 0,
        }
    }

    /// Check the template's internal consistency.
    ///
    /// # Errors
    ///
    /// - `TemplateError::MissingSymmetric` if the key is restricted and
    ///   decrypt-capable but carries no inner wrapping scheme
    /// - `TemplateError::SignAndDecrypt` if both usage flags are set
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.attributes.sign && self.attributes.decrypt {
            return Err(TemplateError::SignAndDecrypt);
        }
        if self.attributes.restricted && self.attributes.decrypt && self.symmetric.is_none() {
            return Err(TemplateError::MissingSymmetric);
        }
        Ok(())
    }
}

/// Template consistency errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Restricted decrypt keys must define an inner wrapping scheme
    #[error("restricted decrypt key requires a symmetric wrapping scheme")]
    MissingSymmetric,

    /// A key must not be both signing- and decrypt-capable
    #[error("key template sets both sign and decrypt")]
    SignAndDecrypt,
}

/// Descriptive public-area fields of a created key, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    pub algorithm: KeyAlg,
    pub name_alg: HashAlg,
    pub attributes: ObjectAttributes,
    pub key_bits: u16,
    pub exponent: u32,
}

/// Result of a successful primary key creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedKey {
    pub handle: ModuleHandle,
    pub public: PublicKeyInfo,
}
