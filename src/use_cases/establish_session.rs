//! Authenticated session establishment use case
//!
//! Four ordered steps: clear the hierarchy auth, draw a caller nonce from
//! the module's own randomness source, open an HMAC session, mark it
//! continuing. Any step's failure aborts establishment; a handle opened by
//! step three is already tracked, so cleanup flushes it even when step
//! four fails.

use tracing::debug;

use crate::error::SessionEstablishError;
use crate::logic::check;
use crate::model::{AuthValue, HashAlg, Hierarchy, ModuleHandle, SessionAttributes, SessionKind};
use crate::ports::{Reporter, TpmCommands};
use crate::use_cases::AcquiredHandles;

/// Caller-nonce size requested from the module's randomness source.
pub const NONCE_LEN: usize = 17;

/// Establish a continuing HMAC-authorized session under `hierarchy`.
///
/// # Errors
///
/// One `SessionEstablishError` variant per failed step, each carrying the
/// decoded command failure.
pub fn establish_session<T, R>(
    tpm: &mut T,
    ui: &mut R,
    hierarchy: Hierarchy,
    acquired: &mut AcquiredHandles,
) -> Result<ModuleHandle, SessionEstablishError>
where
    T: TpmCommands,
    R: Reporter,
{
    check(
        tpm.set_auth(hierarchy, &AuthValue::empty()),
        "SetAuth",
        tpm,
        ui,
    )
    .map_err(SessionEstablishError::SetAuth)?;
    ui.success(&format!("{hierarchy} hierarchy auth set (empty)"));

    let nonce = check(tpm.get_random(NONCE_LEN), "GetRandom", tpm, ui)
        .map_err(SessionEstablishError::NonceAcquisition)?;
    debug!("caller nonce: {}", hex::encode(&nonce));
    ui.success(&format!(
        "generated {}-byte caller nonce using module RNG",
        nonce.len()
    ));

    let session = check(
        tpm.start_auth_session(&nonce, SessionKind::Hmac, HashAlg::Sha256),
        "StartAuthSession",
        tpm,
        ui,
    )
    .map_err(SessionEstablishError::SessionOpen)?;
    // Tracked before anything else can fail; the session is a real module
    // resource from this point on.
    acquired.track("hmac session", session);
    ui.success("HMAC session started");

    let attributes = SessionAttributes::continuing();
    check(
        tpm.set_session_attributes(session, attributes),
        "SetSessionAttributes",
        tpm,
        ui,
    )
    .map_err(SessionEstablishError::Attributes)?;

    ui.kv("session handle", &session.to_string());
    ui.kv("auth hash", &HashAlg::Sha256.to_string());
    ui.kv("symmetric", "NULL (no parameter encryption)");
    ui.kv("attributes", &attributes.to_string());

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CommandKind, RecordingReporter, SimConnector};
    use crate::model::ReturnCode;

    #[test]
    fn test_establishes_a_continuing_session() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        let session =
            establish_session(&mut tpm, &mut ui, Hierarchy::Owner, &mut acquired).unwrap();

        assert_eq!(acquired.len(), 1);
        let attrs = connector.session_attributes(session).unwrap();
        assert_eq!(attrs, SessionAttributes::continuing());
        assert_eq!(connector.last_random_request(), Some(NONCE_LEN));
    }

    #[test]
    fn test_nonce_failure_leaves_nothing_tracked() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();
        connector.fail_command(CommandKind::GetRandom, ReturnCode::from_raw(0x101));

        let err =
            establish_session(&mut tpm, &mut ui, Hierarchy::Owner, &mut acquired).unwrap_err();

        assert!(matches!(err, SessionEstablishError::NonceAcquisition(_)));
        assert!(acquired.is_empty());
        assert!(connector.open_handles().is_empty());
    }

    #[test]
    fn test_attribute_failure_keeps_session_tracked() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();
        connector.fail_command(
            CommandKind::SetSessionAttributes,
            ReturnCode::from_raw(0x101),
        );

        let err =
            establish_session(&mut tpm, &mut ui, Hierarchy::Owner, &mut acquired).unwrap_err();

        assert!(matches!(err, SessionEstablishError::Attributes(_)));
        // The opened handle is tracked for cleanup to flush.
        assert_eq!(acquired.len(), 1);
        assert_eq!(connector.open_handles().len(), 1);
    }

    #[test]
    fn test_session_open_failure_is_its_own_variant() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();
        connector.fail_command(CommandKind::StartAuthSession, ReturnCode::from_raw(0x101));

        let err =
            establish_session(&mut tpm, &mut ui, Hierarchy::Owner, &mut acquired).unwrap_err();

        assert!(matches!(err, SessionEstablishError::SessionOpen(_)));
        assert!(acquired.is_empty());
    }
}
