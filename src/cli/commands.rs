//! Command handlers for the CLI

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{QueryOutcome, QueryService};
use crate::cli::args::{Cli, Commands, ConfigCommands, RunArgs, SourceArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{FormatOptions, RunLocator};
use crate::infrastructure::di::ServiceContainer;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Commands::Get {
            settings,
            source,
            shallow,
        } => cmd_get(container, settings, source, *shallow),
        Commands::Dump { source, shallow } => cmd_dump(container, source, *shallow),
        Commands::Path { run } => cmd_path(container, run),
        Commands::Aliases => cmd_aliases(container),
        Commands::Config { command } => cmd_config(container, command),
        Commands::Completion { shell } => cmd_completion(*shell),
    }
}

impl SourceArgs {
    /// Config file this source points at; run paths fall back to the configured data dir.
    pub fn config_path(&self, settings: &Settings) -> CliResult<PathBuf> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }
        match (self.station, self.run) {
            (Some(station), Some(run)) => {
                let dir = self.dir.clone().unwrap_or_else(|| settings.data_dir.clone());
                Ok(RunLocator::new(dir, station, run).config_path())
            }
            _ => Err(CliError::InvalidArgs(
                "either --file or both --station and --run are required".into(),
            )),
        }
    }
}

impl RunArgs {
    pub fn locator(&self, settings: &Settings) -> RunLocator {
        let dir = self.dir.clone().unwrap_or_else(|| settings.data_dir.clone());
        RunLocator::new(dir, self.station, self.run)
    }
}

fn query_service(container: &ServiceContainer, shallow: bool) -> QueryService {
    let service = container.query_service();
    if shallow {
        service.with_options(FormatOptions::shallow())
    } else {
        service
    }
}

#[instrument(skip(container))]
fn cmd_get(
    container: &ServiceContainer,
    settings: &[String],
    source: &SourceArgs,
    shallow: bool,
) -> CliResult<()> {
    let path = source.config_path(&container.settings)?;
    let service = query_service(container, shallow);
    let tree = service.load(&path)?;

    let queries = if settings.is_empty() {
        debug!("no settings given, using {}", container.settings.default_setting);
        vec![container.settings.default_setting.clone()]
    } else {
        settings.to_vec()
    };
    report(&service.query_all(&tree, &queries))
}

#[instrument(skip(container))]
fn cmd_dump(container: &ServiceContainer, source: &SourceArgs, shallow: bool) -> CliResult<()> {
    let path = source.config_path(&container.settings)?;
    let service = query_service(container, shallow);
    let tree = service.load(&path)?;
    report(&service.dump(&tree))
}

fn cmd_path(container: &ServiceContainer, run: &RunArgs) -> CliResult<()> {
    let locator = run.locator(&container.settings);
    output::info(&locator.config_path().display());
    Ok(())
}

fn cmd_aliases(container: &ServiceContainer) -> CliResult<()> {
    output::header("Aliases");
    for (alias, path) in container.aliases.iter() {
        output::mapping(alias, path);
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let status = if path.exists() { "" } else { " (not present)" };
                output::info(&format!("{}{}", path.display(), status));
            }
            None => output::warning("no home directory, global config unavailable"),
        },
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

/// Print each outcome; diagnostics go to stderr ahead of the (empty) value line.
fn report(outcomes: &[QueryOutcome]) -> CliResult<()> {
    let mut unresolved = 0;
    for outcome in outcomes {
        if let Some(e) = &outcome.error {
            output::warning(&format!("{}: {}", outcome.query, e));
            unresolved += 1;
        }
        output::info(&outcome.line());
    }
    if unresolved > 0 {
        return Err(CliError::Unresolved { count: unresolved });
    }
    Ok(())
}
