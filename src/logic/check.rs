//! Return-code checking
//!
//! Every privileged command the pipeline issues routes its outcome through
//! `check`; no call site interprets return codes on its own.

use crate::error::CommandFailure;
use crate::model::ReturnCode;
use crate::ports::{CommandResult, RcDecoder, Reporter};

/// Placeholder reason when the driver stack's table has no decoding.
pub const UNKNOWN_REASON: &str = "unknown return code";

/// Translate a command outcome.
///
/// On success the command's value passes through untouched. On a
/// non-success return code the decoded reason is looked up (falling back to
/// [`UNKNOWN_REASON`]), `context + reason` is reported as a failure event,
/// and a [`CommandFailure`] is handed back for the stage error to wrap.
pub fn check<T, D, R>(
    result: CommandResult<T>,
    what: &str,
    decoder: &D,
    ui: &mut R,
) -> Result<T, CommandFailure>
where
    D: RcDecoder + ?Sized,
    R: Reporter + ?Sized,
{
    match result {
        Ok(value) => Ok(value),
        Err(rc) => {
            let reason = decode_reason(decoder, rc);
            ui.fail(&format!("{what}: {reason}"));
            Err(CommandFailure {
                what: what.to_string(),
                rc,
                reason,
            })
        }
    }
}

/// Decoded reason for `rc`, or the unknown placeholder.
pub fn decode_reason<D>(decoder: &D, rc: ReturnCode) -> String
where
    D: RcDecoder + ?Sized,
{
    decoder
        .decode_rc(rc)
        .unwrap_or_else(|| UNKNOWN_REASON.to_string())
}
