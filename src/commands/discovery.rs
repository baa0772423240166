use crate::cli::{ApiVersion, Cli, Commands, SchemaCommands};
use crate::domain::models::{BlockKind, BlockParams, SchemaExportReport};
use crate::library::DspLibrary;
use crate::services::catalog::{control_blocks, dsp_blocks};
use crate::services::inspector::{export_catalog, load_catalog, ParamRegistry};
use crate::services::output::{print_one, print_out, success};

/// Read-only discovery commands. Returns `false` for commands handled elsewhere.
pub fn handle_discovery_commands(
    cli: &Cli,
    lib: &dyn DspLibrary,
    api: ApiVersion,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::ListDsp => {
            let names = dsp_blocks(lib, api)?;
            print_out(cli.json, &names, |n| n.to_string())?;
        }
        Commands::ListControl => {
            let names = control_blocks(lib, api)?;
            print_out(cli.json, &names, |n| n.to_string())?;
        }
        Commands::ListParams { block } => {
            let registry = ParamRegistry::from_catalog(load_catalog(lib, api, cli.schema.as_deref())?);
            let kind = registry.lookup(block)?.kind;
            let params = registry.param_names(block)?;
            print_block_params(cli.json, block, kind, params)?;
        }
        Commands::ListParamTypes { block } => {
            let registry = ParamRegistry::from_catalog(load_catalog(lib, api, cli.schema.as_deref())?);
            let kind = registry.lookup(block)?.kind;
            let types = registry.param_types(block)?;
            print_block_params(cli.json, block, kind, types)?;
        }
        Commands::Schema { command } => match command {
            SchemaCommands::Export { output } => {
                let catalog = load_catalog(lib, api, cli.schema.as_deref())?;
                export_catalog(&catalog, output)?;
                let report = SchemaExportReport {
                    path: output.display().to_string(),
                    dsp_blocks: catalog.dsp.len(),
                    control_blocks: catalog.control.len(),
                };
                if cli.json {
                    print_one(true, report, |_| String::new())?;
                } else {
                    success(&format!(
                        "exported {} DSP and {} control block schemas to {}",
                        report.dsp_blocks, report.control_blocks, report.path
                    ));
                }
            }
        },
        Commands::Validate { .. }
        | Commands::GenerateBin { .. }
        | Commands::Deploy { .. }
        | Commands::Clean { .. }
        | Commands::History { .. } => return Ok(false),
    }

    Ok(true)
}

fn print_block_params(
    json: bool,
    block: &str,
    kind: BlockKind,
    params: Vec<String>,
) -> anyhow::Result<()> {
    if json {
        return print_one(
            true,
            BlockParams {
                block: block.to_string(),
                kind,
                params,
            },
            |_| String::new(),
        );
    }
    print_out(false, &params, |p| p.to_string())
}
