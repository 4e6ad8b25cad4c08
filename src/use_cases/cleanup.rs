//! Cleanup use case - best-effort flush of every acquired handle

use crate::error::FlushError;
use crate::logic::check;
use crate::ports::{Reporter, TpmCommands};

use crate::model::ModuleHandle;

/// Handles acquired from the module during a pipeline run, in acquisition
/// order, each with a label for reporting.
///
/// A handle is registered the moment the module allocates it, before any
/// further command is issued, so a later stage failure can never orphan it.
#[derive(Debug, Default)]
pub struct AcquiredHandles {
    handles: Vec<(&'static str, ModuleHandle)>,
}

impl AcquiredHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly allocated handle.
    pub fn track(&mut self, label: &'static str, handle: ModuleHandle) {
        self.handles.push((label, handle));
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

/// Flush every tracked handle, in reverse acquisition order (a key created
/// under a session goes before that session).
///
/// Cleanup is best effort: a failed flush is reported and recorded but the
/// remaining handles are still attempted, since leaving one handle
/// un-flushed is no reason to also leak the others. An empty tracker
/// issues zero commands and is not an error.
///
/// # Errors
///
/// Returns `FlushError` accumulating every per-handle failure; `Ok` carries
/// the number of handles flushed.
pub fn flush_all<T, R>(
    tpm: &mut T,
    ui: &mut R,
    acquired: &mut AcquiredHandles,
) -> Result<usize, FlushError>
where
    T: TpmCommands,
    R: Reporter,
{
    let mut flushed = 0usize;
    let mut failures = Vec::new();

    for (label, handle) in acquired.handles.drain(..).rev() {
        let what = format!("FlushContext ({label})");
        match check(tpm.flush_context(handle), &what, tpm, ui) {
            Ok(()) => {
                ui.success(&format!("flushed {label} {handle}"));
                flushed += 1;
            }
            Err(failure) => failures.push((label, handle, failure)),
        }
    }

    if failures.is_empty() {
        Ok(flushed)
    } else {
        Err(FlushError { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CommandKind, RecordingReporter, SimConnector};
    use crate::model::{HashAlg, ReturnCode, SessionKind};

    #[test]
    fn test_empty_tracker_is_a_noop() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        assert_eq!(flush_all(&mut tpm, &mut ui, &mut acquired), Ok(0));
        assert!(ui.failures().is_empty());
        assert!(connector.flush_log().is_empty());
    }

    #[test]
    fn test_flushes_in_reverse_acquisition_order() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        let first = tpm
            .start_auth_session(&[1u8; 17], SessionKind::Hmac, HashAlg::Sha256)
            .unwrap();
        let second = tpm
            .start_auth_session(&[2u8; 17], SessionKind::Hmac, HashAlg::Sha256)
            .unwrap();
        acquired.track("first", first);
        acquired.track("second", second);

        assert_eq!(flush_all(&mut tpm, &mut ui, &mut acquired), Ok(2));
        assert_eq!(connector.flush_log(), vec![second, first]);
        assert!(acquired.is_empty());
    }

    #[test]
    fn test_failed_flush_does_not_stop_the_rest() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        let session = tpm
            .start_auth_session(&[1u8; 17], SessionKind::Hmac, HashAlg::Sha256)
            .unwrap();
        acquired.track("hmac session", session);
        acquired.track("primary key", crate::model::ModuleHandle::from_raw(0x8000_0042));

        // The bogus key handle fails; the session must still be flushed.
        let err = flush_all(&mut tpm, &mut ui, &mut acquired).unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].0, "primary key");
        assert_eq!(connector.flush_log(), vec![session]);
        assert_eq!(ui.failures().len(), 1);
    }

    #[test]
    fn test_injected_flush_failure_is_surfaced() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        let session = tpm
            .start_auth_session(&[1u8; 17], SessionKind::Hmac, HashAlg::Sha256)
            .unwrap();
        acquired.track("hmac session", session);
        connector.fail_command(CommandKind::FlushContext, ReturnCode::from_raw(0x101));

        let err = flush_all(&mut tpm, &mut ui, &mut acquired).unwrap_err();
        assert_eq!(err.failures[0].1, session);
    }
}
