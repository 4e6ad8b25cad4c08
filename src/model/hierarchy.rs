//! Protected hierarchies and startup kinds

use std::fmt;

/// Protected hierarchy a primary key can be created under.
///
/// This core provisions under the owner hierarchy; the other hierarchies
/// exist so the command interface can name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hierarchy {
    Owner,
    Endorsement,
    Platform,
    Null,
}

impl Hierarchy {
    /// Hierarchy used for storage primary keys.
    pub fn default_storage() -> Self {
        Self::Owner
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hierarchy::Owner => "owner",
            Hierarchy::Endorsement => "endorsement",
            Hierarchy::Platform => "platform",
            Hierarchy::Null => "null",
        };
        f.write_str(name)
    }
}

/// Kind of startup signal sent to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupKind {
    /// Reset volatile state (SU_CLEAR class).
    Clear,
    /// Resume from saved state (SU_STATE class).
    State,
}
