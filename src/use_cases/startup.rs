//! Startup use case - the one advisory, non-propagating stage

use tracing::debug;

use crate::logic::decode_reason;
use crate::model::StartupKind;
use crate::ports::{Reporter, TpmCommands};

/// Signal the module it may initialize volatile state.
///
/// A non-success answer commonly means the platform already took the
/// module through this step in a prior power cycle, so it is reported as a
/// warning and the pipeline continues either way. The returned bool only
/// records what happened; no caller treats it as fatal.
pub fn startup<T, R>(tpm: &mut T, ui: &mut R) -> bool
where
    T: TpmCommands,
    R: Reporter,
{
    match tpm.startup(StartupKind::Clear) {
        Ok(()) => {
            ui.success("module startup (clear) completed");
            true
        }
        Err(rc) => {
            let reason = decode_reason(tpm, rc);
            debug!("startup answered rc {rc}");
            ui.warn(&format!("startup returned: {reason}"));
            ui.kv("note", "often means 'already started', continuing");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{RecordingReporter, SimConnector};

    #[test]
    fn test_pristine_module_starts_up() {
        let connector = SimConnector::pristine();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();

        assert!(startup(&mut tpm, &mut ui));
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn test_already_started_module_warns_and_continues() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();

        assert!(!startup(&mut tpm, &mut ui));
        let warnings = ui.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("TPM_RC_INITIALIZE"));
        // Advisory only: nothing is reported as a failure.
        assert!(ui.failures().is_empty());
    }
}
