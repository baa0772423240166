use crate::cli::ApiVersion;
use crate::domain::models::{
    DeploymentConfig, ListResult, OperationResult, RuleOutcome, SchemaCatalog,
};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Queries offered by the external DSP configuration library.
///
/// Every call carries the API version explicitly; the library owns block
/// semantics, rule evaluation, the binary format and the device transport.
pub trait DspLibrary {
    fn list(&self, api: ApiVersion) -> Result<ListResult, LibraryError>;
    fn describe(&self, api: ApiVersion) -> Result<SchemaCatalog, LibraryError>;
    fn validate(&self, api: ApiVersion, description: &str)
        -> Result<Vec<RuleOutcome>, LibraryError>;
    fn generate(&self, api: ApiVersion, description: &str) -> Result<Vec<u8>, LibraryError>;
    fn deploy(
        &self,
        api: ApiVersion,
        file_name: &str,
        payload: &[u8],
        target: &DeploymentConfig,
        reboot: bool,
    ) -> Result<OperationResult, LibraryError>;
    fn clean(
        &self,
        api: ApiVersion,
        target: &DeploymentConfig,
        reboot: bool,
    ) -> Result<OperationResult, LibraryError>;
}

#[derive(thiserror::Error, Debug)]
pub enum LibraryError {
    #[error("failed to start library bridge `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("library bridge i/o")]
    Io(#[from] std::io::Error),
    #[error("library `{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("could not encode `{command}` request")]
    Encode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed `{command}` response from library")]
    MalformedResponse {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("library payload is not valid hex")]
    BadPayload(#[from] hex::FromHexError),
}

#[derive(Serialize)]
struct VersionRequest {
    api_version: ApiVersion,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    api_version: ApiVersion,
    description: &'a str,
}

#[derive(Serialize)]
struct DeployRequest<'a> {
    api_version: ApiVersion,
    file_name: &'a str,
    payload_hex: String,
    target: &'a DeploymentConfig,
    reboot: bool,
}

#[derive(Serialize)]
struct CleanRequest<'a> {
    api_version: ApiVersion,
    target: &'a DeploymentConfig,
    reboot: bool,
}

#[derive(Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    outcomes: Vec<RuleOutcome>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    payload_hex: String,
}

/// Runs the library through a bridge executable: `<program> <command>`,
/// request JSON on stdin, response JSON on stdout.
pub struct BridgeLibrary {
    program: PathBuf,
}

impl BridgeLibrary {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn call<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        command: &str,
        request: &Req,
    ) -> Result<Resp, LibraryError> {
        let body = serde_json::to_vec(request).map_err(|source| LibraryError::Encode {
            command: command.to_string(),
            source,
        })?;
        debug!("bridge {} {} ({} byte request)", self.program.display(), command, body.len());

        let mut child = Command::new(&self.program)
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LibraryError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        if let Some(mut stdin) = child.stdin.take() {
            // A bridge may exit before reading its request; its status and
            // stderr are reported below instead.
            match stdin.write_all(&body) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("bridge {} closed stdin early", command);
                }
                other => other?,
            }
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(LibraryError::Failed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!("bridge {} answered {} bytes", command, output.stdout.len());
        serde_json::from_slice(&output.stdout).map_err(|source| LibraryError::MalformedResponse {
            command: command.to_string(),
            source,
        })
    }
}

impl DspLibrary for BridgeLibrary {
    fn list(&self, api: ApiVersion) -> Result<ListResult, LibraryError> {
        self.call("list", &VersionRequest { api_version: api })
    }

    fn describe(&self, api: ApiVersion) -> Result<SchemaCatalog, LibraryError> {
        self.call("describe", &VersionRequest { api_version: api })
    }

    fn validate(
        &self,
        api: ApiVersion,
        description: &str,
    ) -> Result<Vec<RuleOutcome>, LibraryError> {
        let resp: ValidateResponse = self.call(
            "validate",
            &DescriptionRequest {
                api_version: api,
                description,
            },
        )?;
        Ok(resp.outcomes)
    }

    fn generate(&self, api: ApiVersion, description: &str) -> Result<Vec<u8>, LibraryError> {
        let resp: GenerateResponse = self.call(
            "generate",
            &DescriptionRequest {
                api_version: api,
                description,
            },
        )?;
        Ok(hex::decode(resp.payload_hex.trim())?)
    }

    fn deploy(
        &self,
        api: ApiVersion,
        file_name: &str,
        payload: &[u8],
        target: &DeploymentConfig,
        reboot: bool,
    ) -> Result<OperationResult, LibraryError> {
        self.call(
            "deploy",
            &DeployRequest {
                api_version: api,
                file_name,
                payload_hex: hex::encode(payload),
                target,
                reboot,
            },
        )
    }

    fn clean(
        &self,
        api: ApiVersion,
        target: &DeploymentConfig,
        reboot: bool,
    ) -> Result<OperationResult, LibraryError> {
        self.call(
            "clean",
            &CleanRequest {
                api_version: api,
                target,
                reboot,
            },
        )
    }
}
