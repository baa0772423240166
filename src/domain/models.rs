use crate::cli::ApiVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;

fn default_reboot() -> bool {
    true
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsFile {
    #[serde(default)]
    pub library: LibrarySettings,
    #[serde(default)]
    pub deploy: DeploySettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct LibrarySettings {
    #[serde(default)]
    pub bridge: Option<String>,
    #[serde(default)]
    pub api_version: Option<ApiVersion>,
}

#[derive(Debug, Deserialize)]
pub struct DeploySettings {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub identity_file: Option<PathBuf>,
    #[serde(default)]
    pub passphrase: Option<String>,
    #[serde(default = "default_reboot")]
    pub reboot: bool,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            password: None,
            identity_file: None,
            passphrase: None,
            reboot: default_reboot(),
        }
    }
}

/// Block names as reported by the library's `list` query. Order is
/// whatever the library returned until passed through the catalog service.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ListResult {
    #[serde(default)]
    pub dsp_block_names: Vec<String>,
    #[serde(default)]
    pub control_block_names: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RuleOutcome {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RuleFailure {
    pub index: usize,
    pub rule: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ValidationReport {
    pub file: String,
    pub valid: bool,
    pub rules_evaluated: usize,
    pub failures: Vec<RuleFailure>,
}

/// One parameter field of a block schema.
///
/// `descriptor` is the class name of the library's type descriptor. It is
/// what identifies wrapped field types (optional, repeated) that carry no
/// `type_name` of their own.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub descriptor: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    #[serde(default)]
    pub dsp: BTreeMap<String, Vec<FieldDescriptor>>,
    #[serde(default)]
    pub control: BTreeMap<String, Vec<FieldDescriptor>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Dsp,
    Control,
}

#[derive(Debug, Serialize)]
pub struct BlockParams {
    pub block: String,
    pub kind: BlockKind,
    pub params: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DeploymentConfig {
    pub address: Ipv4Addr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

/// Outcome of a deploy or clean request.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct OperationResult {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct GenerateReport {
    pub source: String,
    pub artifact: String,
    pub bytes: usize,
    pub sha256: String,
}

#[derive(Serialize)]
pub struct DeviceReport {
    pub action: String,
    pub address: String,
    pub reboot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    pub result: OperationResult,
}

#[derive(Serialize)]
pub struct SchemaExportReport {
    pub path: String,
    pub dsp_blocks: usize,
    pub control_blocks: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoryEvent {
    pub ts: String,
    pub action: String,
    pub address: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default)]
    pub errors: usize,
    #[serde(default)]
    pub warnings: usize,
    /// Set when the library could not be reached or answered garbage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
