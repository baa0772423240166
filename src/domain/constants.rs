pub const DEFAULT_SYSTEM_FILE: &str = "system.json";
pub const DEFAULT_BIN_FILE: &str = "system.bin";
pub const DEFAULT_SCHEMA_EXPORT: &str = "dsp-schema.json";
pub const DEFAULT_BRIDGE: &str = "dyndsp-bridge";

/// Relative to `$HOME`.
pub const CONFIG_FILE: &str = ".config/dspctl/config.toml";
pub const HISTORY_FILE: &str = ".local/state/dspctl/history.jsonl";
