use crate::domain::constants::{DEFAULT_BIN_FILE, DEFAULT_SCHEMA_EXPORT, DEFAULT_SYSTEM_FILE};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dspctl",
    version,
    about = "List, inspect, validate, generate and deploy dynamic DSP systems"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: ~/.config/dspctl/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "DSPCTL_BRIDGE",
        help = "Executable bridging to the DSP configuration library"
    )]
    pub bridge: Option<String>,
    #[arg(long, global = true, value_enum, help = "Library API version")]
    pub api_version: Option<ApiVersion>,
    #[arg(
        long,
        global = true,
        help = "Exported parameter schema to use instead of querying the library"
    )]
    pub schema: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available DSP block names
    ListDsp,
    /// List available control block names
    ListControl,
    /// List the parameter names of a block
    ListParams { block: String },
    /// List the parameter type names of a block
    ListParamTypes { block: String },
    /// Export the parameter schema for offline lookups
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Validate a system description
    Validate {
        #[arg(default_value = DEFAULT_SYSTEM_FILE)]
        file: PathBuf,
    },
    /// Validate a system description and write its binary artifact
    GenerateBin {
        #[arg(default_value = DEFAULT_SYSTEM_FILE)]
        file: PathBuf,
        #[arg(short, long, help = "Artifact path (default: <stem>.bin in the current directory)")]
        output: Option<PathBuf>,
    },
    /// Push a binary artifact to a device
    Deploy {
        ip_address: Ipv4Addr,
        #[arg(long, default_value = DEFAULT_BIN_FILE)]
        bin: PathBuf,
        #[command(flatten)]
        access: AccessArgs,
    },
    /// Remove the deployed configuration from a device
    Clean {
        ip_address: Ipv4Addr,
        #[command(flatten)]
        access: AccessArgs,
    },
    /// Show recorded deploy and clean attempts
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// Write the library's parameter schema to a file
    Export {
        #[arg(short, long, default_value = DEFAULT_SCHEMA_EXPORT)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct AccessArgs {
    #[arg(long, env = "DSPCTL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[arg(long)]
    pub identity_file: Option<PathBuf>,
    #[arg(long, env = "DSPCTL_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
    #[arg(long, default_value_t = false, help = "Do not reboot the device afterwards")]
    pub no_reboot: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V1alpha1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1alpha1 => "v1alpha1",
        }
    }
}
