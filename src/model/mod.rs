mod auth;
mod handle;
mod hierarchy;
mod key_template;
mod return_code;
mod session;

pub use auth::{AuthCredential, AuthValue};
pub use handle::ModuleHandle;
pub use hierarchy::{Hierarchy, StartupKind};
pub use key_template::{
    CreatedKey, KeyAlg, KeyTemplate, ObjectAttributes, PublicKeyInfo, SymmetricAlg, SymmetricDef,
    SymmetricMode, TemplateError,
};
pub use return_code::ReturnCode;
pub use session::{HashAlg, SessionAttributes, SessionKind};
