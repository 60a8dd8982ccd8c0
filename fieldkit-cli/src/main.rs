//! fieldkit CLI - inspect and evaluate the built-in profile form.
//!
//! Commands:
//! - `fieldkit fields`: List fields in render order
//! - `fieldkit visible <data>`: Show which fields a record makes visible
//! - `fieldkit validate <data> [--set name=value]...`: Validate a record
//! - `fieldkit change <data> <name> <value>`: Apply one edit and print the record
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 2: Form is invalid

use anyhow::Result;
use clap::Parser;
use fieldkit::{change, fields, input, validate, visible};
use fieldkit::{Cli, Commands};
use fieldkit_config::{FormSettings, SettingsLoader};
use fieldkit_profile::profile_form;
use tracing_subscriber::EnvFilter;

/// Exit code returned when validation finds failing fields.
const FORM_INVALID_EXIT_CODE: i32 = 2;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("fieldkit=debug,fieldkit_fields=debug,fieldkit_config=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    std::process::exit(exit_code);
}

fn load_settings(cli: &Cli) -> Result<FormSettings> {
    let mut loader = SettingsLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let settings = loader.load()?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

/// Dispatch a parsed CLI to the appropriate command handler.
fn run(cli: Cli) -> Result<i32> {
    let settings = load_settings(&cli)?;
    let registry = profile_form();

    match cli.command {
        Commands::Fields { format } => {
            println!("{}", fields::render_fields(registry, format)?);
            Ok(0)
        }
        Commands::Visible { data, format } => {
            let data = input::read_form_data(&data)?;
            println!("{}", visible::render_visible(registry, &data, format)?);
            Ok(0)
        }
        Commands::Validate { data, set, format } => {
            let data = input::read_form_data(&data)?;
            let overrides = set
                .iter()
                .map(|raw| input::parse_assignment(raw))
                .collect::<Result<Vec<_>>>()?;
            let result = validate::validate_record(registry, &settings, data, overrides)?;
            println!("{}", validate::render_validation(&result, format)?);
            Ok(if result.is_form_valid {
                0
            } else {
                FORM_INVALID_EXIT_CODE
            })
        }
        Commands::Change { data, name, value } => {
            let data = input::read_form_data(&data)?;
            let outcome =
                change::apply_change(registry, &settings, data, &name, input::parse_value(&value))?;
            println!("{}", serde_json::to_string_pretty(&outcome.data)?);
            Ok(0)
        }
    }
}
