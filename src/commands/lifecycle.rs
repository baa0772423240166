use crate::cli::{ApiVersion, Cli, Commands};
use crate::domain::models::{
    DeviceReport, GenerateReport, HistoryEvent, OperationResult, SettingsFile, ValidationReport,
};
use crate::library::{DspLibrary, LibraryError};
use crate::services::history::{self, now_ts};
use crate::services::lifecycle::{
    artifact_path, clean_device, deploy_artifact, generate_artifact, read_artifact,
    read_description, sha256_hex, validate_system, write_artifact, Generated,
};
use crate::services::output::{
    detail, error, failure, print_json_failure, print_one, print_out, success, warning,
};
use crate::services::settings::{deployment_config, reboot_flag};
use std::net::Ipv4Addr;
use std::process::ExitCode;

pub fn handle_lifecycle_commands(
    cli: &Cli,
    lib: &dyn DspLibrary,
    api: ApiVersion,
    settings: &SettingsFile,
) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Validate { file } => {
            let name = file.display().to_string();
            let description = read_description(file)?;
            let report = validate_system(lib, api, &name, &description)?;
            if !report.valid {
                report_invalid(cli.json, report)?;
                return Ok(ExitCode::FAILURE);
            }
            if cli.json {
                print_one(true, report, |_| String::new())?;
            } else {
                success(&format!(
                    "{} is valid ({} rules passed)",
                    report.file, report.rules_evaluated
                ));
            }
        }
        Commands::GenerateBin { file, output } => {
            let name = file.display().to_string();
            let description = read_description(file)?;
            let bytes = match generate_artifact(lib, api, &name, &description)? {
                Generated::Invalid(report) => {
                    report_invalid(cli.json, report)?;
                    return Ok(ExitCode::FAILURE);
                }
                Generated::Artifact(bytes) => bytes,
            };
            let path = output.clone().unwrap_or_else(|| artifact_path(file));
            write_artifact(&path, &bytes)?;
            let report = GenerateReport {
                source: name,
                artifact: path.display().to_string(),
                bytes: bytes.len(),
                sha256: sha256_hex(&bytes),
            };
            if cli.json {
                print_one(true, report, |_| String::new())?;
            } else {
                success(&format!(
                    "wrote {} ({} bytes, sha256 {})",
                    report.artifact, report.bytes, report.sha256
                ));
            }
        }
        Commands::Deploy {
            ip_address,
            bin,
            access,
        } => {
            let target = deployment_config(*ip_address, access, &settings.deploy);
            let reboot = reboot_flag(access, &settings.deploy);
            let artifact = read_artifact(bin)?;
            let outcome = deploy_artifact(lib, api, &artifact, &target, reboot);
            record_attempt("deploy", *ip_address, Some(&artifact.sha256), &outcome);
            let result = outcome?;
            let ok = result.success;
            if cli.json {
                let report = DeviceReport {
                    action: "deploy".to_string(),
                    address: ip_address.to_string(),
                    reboot,
                    sha256: Some(artifact.sha256),
                    result,
                };
                if ok {
                    print_one(true, report, |_| String::new())?;
                } else {
                    print_json_failure(report)?;
                }
            } else {
                for e in &result.errors {
                    error(e);
                }
                for w in &result.warnings {
                    warning(w);
                }
                if ok {
                    success(&format!("deployed {} to {}", bin.display(), ip_address));
                }
            }
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Clean { ip_address, access } => {
            let target = deployment_config(*ip_address, access, &settings.deploy);
            let reboot = reboot_flag(access, &settings.deploy);
            let outcome = clean_device(lib, api, &target, reboot);
            record_attempt("clean", *ip_address, None, &outcome);
            let result = outcome?;
            let ok = result.success;
            if cli.json {
                let report = DeviceReport {
                    action: "clean".to_string(),
                    address: ip_address.to_string(),
                    reboot,
                    sha256: None,
                    result,
                };
                if ok {
                    print_one(true, report, |_| String::new())?;
                } else {
                    print_json_failure(report)?;
                }
            } else if ok {
                for w in &result.warnings {
                    warning(w);
                }
                success(&format!("cleaned configuration from {}", ip_address));
            } else {
                error(&format!(
                    "failed to clean configuration from device at {}",
                    ip_address
                ));
                for e in &result.errors {
                    detail(e);
                }
                for w in &result.warnings {
                    warning(w);
                }
            }
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::History { limit } => {
            let events = history::load(*limit)?;
            print_out(cli.json, &events, |e| {
                format!(
                    "{}\t{}\t{}\t{}",
                    e.ts,
                    e.action,
                    e.address,
                    if e.success { "ok" } else { "failed" }
                )
            })?;
        }
        Commands::ListDsp
        | Commands::ListControl
        | Commands::ListParams { .. }
        | Commands::ListParamTypes { .. }
        | Commands::Schema { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

/// Every device attempt is logged, including ones the library never answered.
fn record_attempt(
    action: &str,
    address: Ipv4Addr,
    sha256: Option<&str>,
    outcome: &Result<OperationResult, LibraryError>,
) {
    let (success, errors, warnings, cause) = match outcome {
        Ok(r) => (r.success, r.errors.len(), r.warnings.len(), None),
        Err(e) => (false, 1, 0, Some(error_chain(e))),
    };
    history::record(&HistoryEvent {
        ts: now_ts(),
        action: action.to_string(),
        address: address.to_string(),
        success,
        sha256: sha256.map(str::to_string),
        errors,
        warnings,
        error: cause,
    });
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}

fn report_invalid(json: bool, report: ValidationReport) -> anyhow::Result<()> {
    if json {
        return print_json_failure(report);
    }
    failure(&format!(
        "{} is invalid: {} of {} rules failed",
        report.file,
        report.failures.len(),
        report.rules_evaluated
    ));
    for f in &report.failures {
        error(&f.message);
    }
    Ok(())
}
