#[macro_export]
macro_rules! contract_tests_for {
      (
          $mod_name:ident,
          make = $make:expr,
          tests = {
            $( $test_name:ident => $tmpl:path ),+ $(,)?
        }
      ) => {
          mod $mod_name {
              use super::*;

              $(
                  #[test]
                  fn $test_name() {
                      let op = ($make)();
                      $tmpl(op);
                  }
              )+
          }
      };
  }

#[cfg(test)]
pub mod tpm_contract {
    use crate::model::{
        AuthCredential, AuthValue, HashAlg, Hierarchy, KeyTemplate, ModuleHandle,
        SessionAttributes, SessionKind, StartupKind,
    };
    use crate::ports::TpmCommands;

    const NONCE: [u8; 17] = [7u8; 17];

    pub(crate) fn test_get_random_returns_requested_len(mut device: impl TpmCommands) {
        let bytes = device.get_random(17).expect("get_random failed");
        assert_eq!(bytes.len(), 17);
    }

    /// A pristine module accepts one startup; the second reports it has
    /// already been through this step.
    pub(crate) fn test_second_startup_is_non_success(mut device: impl TpmCommands) {
        assert!(device.startup(StartupKind::Clear).is_ok());
        assert!(device.startup(StartupKind::Clear).is_err());
    }

    pub(crate) fn test_session_open_flush_once(mut device: impl TpmCommands) {
        let session = device
            .start_auth_session(&NONCE, SessionKind::Hmac, HashAlg::Sha256)
            .expect("session open failed");

        assert!(device
            .set_session_attributes(session, SessionAttributes::continuing())
            .is_ok());
        assert!(device.flush_context(session).is_ok());
        // Handle is gone; a second flush must be rejected by the module.
        assert!(device.flush_context(session).is_err());
    }

    pub(crate) fn test_flush_unknown_handle_fails(mut device: impl TpmCommands) {
        let result = device.flush_context(ModuleHandle::from_raw(0xdead_beef));
        assert!(result.is_err());
    }

    pub(crate) fn test_short_nonce_rejected(mut device: impl TpmCommands) {
        let result = device.start_auth_session(&[1u8; 8], SessionKind::Hmac, HashAlg::Sha256);
        assert!(result.is_err());
    }

    pub(crate) fn test_create_primary_password_auth(mut device: impl TpmCommands) {
        device
            .set_auth(Hierarchy::Owner, &AuthValue::empty())
            .expect("set_auth failed");

        let created = device
            .create_primary(
                Hierarchy::Owner,
                &AuthCredential::Password,
                &KeyTemplate::storage_primary(),
            )
            .expect("create_primary failed");

        assert_eq!(created.public.key_bits, 2048);
        assert!(device.flush_context(created.handle).is_ok());
    }

    pub(crate) fn test_create_primary_session_auth(mut device: impl TpmCommands) {
        device
            .set_auth(Hierarchy::Owner, &AuthValue::empty())
            .expect("set_auth failed");
        let session = device
            .start_auth_session(&NONCE, SessionKind::Hmac, HashAlg::Sha256)
            .expect("session open failed");
        device
            .set_session_attributes(session, SessionAttributes::continuing())
            .expect("set attributes failed");

        let created = device
            .create_primary(
                Hierarchy::Owner,
                &AuthCredential::Session(session),
                &KeyTemplate::storage_primary(),
            )
            .expect("create_primary failed");

        assert!(device.flush_context(created.handle).is_ok());
        assert!(device.flush_context(session).is_ok());
    }

    pub(crate) fn test_create_primary_stale_session_rejected(mut device: impl TpmCommands) {
        device
            .set_auth(Hierarchy::Owner, &AuthValue::empty())
            .expect("set_auth failed");

        let result = device.create_primary(
            Hierarchy::Owner,
            &AuthCredential::Session(ModuleHandle::from_raw(0x0200_ffff)),
            &KeyTemplate::storage_primary(),
        );
        assert!(result.is_err());
    }
}
