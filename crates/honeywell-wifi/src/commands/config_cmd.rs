//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = super::effective_config_path(global);
            output::print_output(&path.display().to_string())
        }

        ConfigCommand::Show => {
            let (cfg, _) = super::load(global)?;
            let out = output::render_single(&global.output, &cfg, |c| {
                toml::to_string_pretty(c).map_err(|e| CliError::Validation {
                    field: "config".into(),
                    reason: format!("failed to serialize config: {e}"),
                })
            })?;
            output::print_output(&out)?;
            Ok(())
        }
    }
}
