use crate::cli::ApiVersion;
use crate::domain::models::{
    DeploymentConfig, OperationResult, RuleFailure, RuleOutcome, ValidationReport,
};
use crate::library::{DspLibrary, LibraryError};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub enum Generated {
    Invalid(ValidationReport),
    Artifact(Vec<u8>),
}

pub fn read_description(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read system description {}: {}", path.display(), e))
}

fn failure_message(index: usize, outcome: &RuleOutcome) -> String {
    match (&outcome.message, &outcome.rule) {
        (Some(m), _) if !m.trim().is_empty() => m.clone(),
        (_, Some(rule)) => format!("rule {} failed", rule),
        _ => format!("rule #{} failed", index + 1),
    }
}

/// Valid iff every outcome passed; no outcomes at all is valid.
pub fn build_report(file: &str, outcomes: &[RuleOutcome]) -> ValidationReport {
    let failures: Vec<RuleFailure> = outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.passed)
        .map(|(i, o)| RuleFailure {
            index: i,
            rule: o.rule.clone(),
            message: failure_message(i, o),
        })
        .collect();
    ValidationReport {
        file: file.to_string(),
        valid: failures.is_empty(),
        rules_evaluated: outcomes.len(),
        failures,
    }
}

pub fn validate_system(
    lib: &dyn DspLibrary,
    api: ApiVersion,
    file: &str,
    description: &str,
) -> Result<ValidationReport, LibraryError> {
    let outcomes = lib.validate(api, description)?;
    let report = build_report(file, &outcomes);
    info!(
        "{}: {} rules evaluated, {} failed",
        file,
        report.rules_evaluated,
        report.failures.len()
    );
    Ok(report)
}

/// Validates again right before encoding; nothing is generated for an
/// invalid description.
pub fn generate_artifact(
    lib: &dyn DspLibrary,
    api: ApiVersion,
    file: &str,
    description: &str,
) -> Result<Generated, LibraryError> {
    let report = validate_system(lib, api, file, description)?;
    if !report.valid {
        return Ok(Generated::Invalid(report));
    }
    Ok(Generated::Artifact(lib.generate(api, description)?))
}

/// `<stem>.bin` in the current directory.
pub fn artifact_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "system".into());
    PathBuf::from(stem).with_extension("bin")
}

pub fn write_artifact(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)
        .map_err(|e| anyhow::anyhow!("cannot write artifact {}: {}", path.display(), e))?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Binary artifact as read from disk, ready to send.
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sha256: String,
}

pub fn read_artifact(bin: &Path) -> anyhow::Result<Artifact> {
    let bytes = std::fs::read(bin)
        .map_err(|e| anyhow::anyhow!("cannot read artifact {}: {}", bin.display(), e))?;
    let file_name = bin
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Artifact {
        file_name,
        sha256: sha256_hex(&bytes),
        bytes,
    })
}

pub fn deploy_artifact(
    lib: &dyn DspLibrary,
    api: ApiVersion,
    artifact: &Artifact,
    target: &DeploymentConfig,
    reboot: bool,
) -> Result<OperationResult, LibraryError> {
    info!(
        "deploying {} ({} bytes) to {} reboot={}",
        artifact.file_name,
        artifact.bytes.len(),
        target.address,
        reboot
    );
    lib.deploy(api, &artifact.file_name, &artifact.bytes, target, reboot)
}

pub fn clean_device(
    lib: &dyn DspLibrary,
    api: ApiVersion,
    target: &DeploymentConfig,
    reboot: bool,
) -> Result<OperationResult, LibraryError> {
    info!("cleaning {} reboot={}", target.address, reboot);
    lib.clean(api, target, reboot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::fake::FakeLibrary;
    use std::net::Ipv4Addr;

    fn outcome(passed: bool, message: Option<&str>) -> RuleOutcome {
        RuleOutcome {
            passed,
            rule: None,
            message: message.map(str::to_string),
        }
    }

    fn target() -> DeploymentConfig {
        DeploymentConfig {
            address: Ipv4Addr::new(192, 168, 1, 40),
            password: None,
            identity_file: None,
            passphrase: None,
        }
    }

    #[test]
    fn empty_outcomes_are_vacuously_valid() {
        let report = build_report("system.json", &[]);
        assert!(report.valid);
        assert_eq!(report.rules_evaluated, 0);
    }

    #[test]
    fn one_failure_per_false_outcome() {
        let outcomes = vec![
            outcome(true, None),
            outcome(false, Some("input channel count mismatch")),
            outcome(true, Some("ignored")),
            outcome(false, Some("unconnected output port")),
        ];
        let report = build_report("system.json", &outcomes);
        assert!(!report.valid);
        let msgs: Vec<_> = report.failures.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            msgs,
            vec!["input channel count mismatch", "unconnected output port"]
        );
        assert_eq!(report.failures[1].index, 3);
    }

    #[test]
    fn failures_without_message_still_name_the_rule() {
        let named = RuleOutcome {
            passed: false,
            rule: Some("no_cycles".to_string()),
            message: None,
        };
        let report = build_report("s.json", &[outcome(false, None), named]);
        assert_eq!(report.failures[0].message, "rule #1 failed");
        assert_eq!(report.failures[1].message, "rule no_cycles failed");
    }

    #[test]
    fn invalid_description_is_not_generated() {
        let lib = FakeLibrary {
            outcomes: vec![outcome(false, Some("bad"))],
            payload: vec![1, 2, 3],
            ..FakeLibrary::default()
        };
        let res = generate_artifact(&lib, ApiVersion::V1alpha1, "s.json", "{}").unwrap();
        assert!(matches!(res, Generated::Invalid(_)));
        assert_eq!(lib.calls(), vec!["validate"]);
    }

    #[test]
    fn valid_description_is_revalidated_then_generated() {
        let lib = FakeLibrary {
            outcomes: vec![outcome(true, None)],
            payload: vec![0xde, 0xad, 0xbe, 0xef],
            ..FakeLibrary::default()
        };
        match generate_artifact(&lib, ApiVersion::V1alpha1, "s.json", "{}").unwrap() {
            Generated::Artifact(bytes) => assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]),
            Generated::Invalid(_) => panic!("expected artifact"),
        }
        assert_eq!(lib.calls(), vec!["validate", "generate"]);
    }

    #[test]
    fn artifact_path_replaces_extension_in_current_dir() {
        assert_eq!(artifact_path(Path::new("foo.json")), PathBuf::from("foo.bin"));
        assert_eq!(
            artifact_path(Path::new("/data/systems/living-room.json")),
            PathBuf::from("living-room.bin")
        );
        assert_eq!(artifact_path(Path::new("noext")), PathBuf::from("noext.bin"));
    }

    #[test]
    fn deploy_sends_file_bytes_and_reboot_flag() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = dir.path().join("system.bin");
        std::fs::write(&bin, [7u8, 8, 9]).unwrap();
        let lib = FakeLibrary {
            deploy_result: OperationResult {
                success: true,
                ..OperationResult::default()
            },
            ..FakeLibrary::default()
        };
        let artifact = read_artifact(&bin).unwrap();
        assert_eq!(artifact.file_name, "system.bin");
        assert_eq!(artifact.sha256, sha256_hex(&[7, 8, 9]));
        let res = deploy_artifact(&lib, ApiVersion::V1alpha1, &artifact, &target(), false).unwrap();
        assert!(res.success);
        assert_eq!(*lib.last_payload.borrow(), vec![7, 8, 9]);
        assert_eq!(*lib.last_reboot.borrow(), Some(false));
    }

    #[test]
    fn missing_artifact_is_a_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_artifact(&dir.path().join("system.bin"))
            .err()
            .expect("missing artifact");
        assert!(err.to_string().contains("cannot read artifact"));
    }

    #[test]
    fn clean_passes_reboot_through() {
        let lib = FakeLibrary::default();
        let res = clean_device(&lib, ApiVersion::V1alpha1, &target(), true).unwrap();
        assert!(!res.success);
        assert_eq!(*lib.last_reboot.borrow(), Some(true));
    }
}
