//! Primary key creation use case

use tracing::info;

use crate::error::KeyCreationError;
use crate::logic::check;
use crate::model::{AuthCredential, AuthValue, CreatedKey, Hierarchy, KeyAlg, KeyTemplate};
use crate::ports::{Reporter, TpmCommands};
use crate::use_cases::AcquiredHandles;

/// Create a primary key under `hierarchy`, authorized either by the empty
/// password credential or by an established HMAC session.
///
/// Sensitive-creation data is empty (the module generates all sensitive
/// material) and nothing binds the creation to platform state. On success
/// the key handle is tracked for cleanup and the descriptive public-area
/// fields are reported.
///
/// # Errors
///
/// - `KeyCreationError::Template` if the template is internally inconsistent
/// - `KeyCreationError::SetAuth` / `KeyCreationError::Create` for failed
///   module commands; no handle is allocated on failure
pub fn create_primary<T, R>(
    tpm: &mut T,
    ui: &mut R,
    hierarchy: Hierarchy,
    auth: &AuthCredential,
    template: &KeyTemplate,
    acquired: &mut AcquiredHandles,
) -> Result<CreatedKey, KeyCreationError>
where
    T: TpmCommands,
    R: Reporter,
{
    template.validate()?;

    check(
        tpm.set_auth(hierarchy, &AuthValue::empty()),
        "SetAuth",
        tpm,
        ui,
    )
    .map_err(KeyCreationError::SetAuth)?;
    ui.success(&format!("{hierarchy} hierarchy auth set (empty)"));

    let created = check(
        tpm.create_primary(hierarchy, auth, template),
        "CreatePrimary",
        tpm,
        ui,
    )
    .map_err(KeyCreationError::Create)?;
    acquired.track("primary key", created.handle);
    info!("created primary key {}", created.handle);

    ui.success("CreatePrimary succeeded");
    ui.kv("primary handle", &created.handle.to_string());
    ui.kv("type", &created.public.algorithm.to_string());
    ui.kv("name alg", &created.public.name_alg.to_string());
    ui.kv("attributes", &created.public.attributes.to_string());
    if created.public.algorithm == KeyAlg::Rsa {
        ui.kv("RSA bits", &created.public.key_bits.to_string());
        ui.kv("RSA exponent", &created.public.exponent.to_string());
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CommandKind, RecordingReporter, SimConnector};
    use crate::model::{HashAlg, ObjectAttributes, ReturnCode};

    #[test]
    fn test_create_with_password_auth() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        let created = create_primary(
            &mut tpm,
            &mut ui,
            Hierarchy::Owner,
            &AuthCredential::Password,
            &KeyTemplate::storage_primary(),
            &mut acquired,
        )
        .unwrap();

        assert_eq!(created.public.algorithm, KeyAlg::Rsa);
        assert_eq!(created.public.name_alg, HashAlg::Sha256);
        assert_eq!(created.public.key_bits, 2048);
        assert_eq!(acquired.len(), 1);
    }

    #[test]
    fn test_invalid_template_never_reaches_the_module() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();

        let mut template = KeyTemplate::storage_primary();
        template.symmetric = None;

        let err = create_primary(
            &mut tpm,
            &mut ui,
            Hierarchy::Owner,
            &AuthCredential::Password,
            &template,
            &mut acquired,
        )
        .unwrap_err();

        assert!(matches!(err, KeyCreationError::Template(_)));
        assert!(connector.open_handles().is_empty());
        assert!(acquired.is_empty());
    }

    #[test]
    fn test_signing_only_template_rejected_by_this_profile() {
        let template = KeyTemplate {
            attributes: ObjectAttributes {
                sign: true,
                decrypt: true,
                ..KeyTemplate::storage_primary().attributes
            },
            ..KeyTemplate::storage_primary()
        };
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_create_failure_allocates_nothing() {
        let connector = SimConnector::new();
        let mut tpm = connector.connect("sim").unwrap();
        let mut ui = RecordingReporter::default();
        let mut acquired = AcquiredHandles::new();
        connector.fail_command(CommandKind::CreatePrimary, ReturnCode::from_raw(0x101));

        let err = create_primary(
            &mut tpm,
            &mut ui,
            Hierarchy::Owner,
            &AuthCredential::Password,
            &KeyTemplate::storage_primary(),
            &mut acquired,
        )
        .unwrap_err();

        assert!(matches!(err, KeyCreationError::Create(_)));
        assert!(acquired.is_empty());
        assert!(connector.open_handles().is_empty());
        assert_eq!(ui.failures().len(), 1);
    }
}
