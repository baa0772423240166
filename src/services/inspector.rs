//! Parameter schema lookups.
//!
//! The registry is built once per process from a [`SchemaCatalog`], either
//! fetched with the library's `describe` query or loaded from a file written
//! by `dspctl schema export`. Lookups never go back to the library.

use crate::cli::ApiVersion;
use crate::domain::models::{BlockKind, FieldDescriptor, SchemaCatalog};
use crate::library::DspLibrary;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum InspectError {
    #[error("block not found: {0} (not a DSP or control block)")]
    BlockNotFound(String),
}

#[derive(Debug, Clone)]
pub struct BlockSchema {
    pub kind: BlockKind,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Default)]
pub struct ParamRegistry {
    blocks: HashMap<String, BlockSchema>,
}

/// Declared type of a field, falling back to the descriptor class name for
/// wrapped types that have no name of their own.
pub fn resolve_type(field: &FieldDescriptor) -> &str {
    match field.type_name.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => &field.descriptor,
    }
}

impl ParamRegistry {
    pub fn from_catalog(catalog: SchemaCatalog) -> Self {
        let mut blocks = HashMap::new();
        for (name, fields) in catalog.control {
            blocks.insert(
                name,
                BlockSchema {
                    kind: BlockKind::Control,
                    fields,
                },
            );
        }
        // DSP declarations take precedence over a control block of the same name.
        for (name, fields) in catalog.dsp {
            if blocks.contains_key(&name) {
                warn!("block {} declared as both DSP and control; using DSP schema", name);
            }
            blocks.insert(
                name,
                BlockSchema {
                    kind: BlockKind::Dsp,
                    fields,
                },
            );
        }
        debug!("parameter registry holds {} blocks", blocks.len());
        Self { blocks }
    }

    pub fn lookup(&self, block: &str) -> Result<&BlockSchema, InspectError> {
        self.blocks
            .get(block)
            .ok_or_else(|| InspectError::BlockNotFound(block.to_string()))
    }

    pub fn param_names(&self, block: &str) -> Result<Vec<String>, InspectError> {
        Ok(self
            .lookup(block)?
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect())
    }

    pub fn param_types(&self, block: &str) -> Result<Vec<String>, InspectError> {
        Ok(self
            .lookup(block)?
            .fields
            .iter()
            .map(|f| resolve_type(f).to_string())
            .collect())
    }
}

/// Reads an exported schema file when given, otherwise asks the library.
pub fn load_catalog(
    lib: &dyn DspLibrary,
    api: ApiVersion,
    schema_file: Option<&Path>,
) -> anyhow::Result<SchemaCatalog> {
    match schema_file {
        Some(path) => {
            debug!("using exported schema {}", path.display());
            let raw = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read schema {}: {}", path.display(), e))?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(lib.describe(api)?),
    }
}

pub fn export_catalog(catalog: &SchemaCatalog, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(catalog)?)?;
    Ok(())
}
