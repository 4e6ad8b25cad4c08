//! Pure logic with no port state of its own

mod check;

pub use check::{check, decode_reason, UNKNOWN_REASON};
