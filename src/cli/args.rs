//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Read station acquisition configs: format settings, resolve aliases
#[derive(Parser, Debug)]
#[command(name = "acqcfg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file, layered over the global acqcfg.toml
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print settings as `<setting> : <value>`
    Get {
        /// Aliases or dotted paths (default: configured default_setting)
        settings: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Render groups nested inside groups as empty (legacy output)
        #[arg(long)]
        shallow: bool,
    },

    /// Print every top-level setting
    Dump {
        #[command(flatten)]
        source: SourceArgs,

        /// Render groups nested inside groups as empty (legacy output)
        #[arg(long)]
        shallow: bool,
    },

    /// Print the acq.cfg path of a station run
    Path {
        #[command(flatten)]
        run: RunArgs,
    },

    /// List setting aliases
    Aliases,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where to read the acquisition config from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Config file to read instead of a station run
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with_all = ["station", "run", "dir"])]
    pub file: Option<PathBuf>,

    /// Station number
    #[arg(short, long, required_unless_present = "file", requires = "run")]
    pub station: Option<u32>,

    /// Run number
    #[arg(short, long, required_unless_present = "file", requires = "station")]
    pub run: Option<u32>,

    /// Data directory (default: configured data_dir)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Station number
    #[arg(short, long)]
    pub station: u32,

    /// Run number
    #[arg(short, long)]
    pub run: u32,

    /// Data directory (default: configured data_dir)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show global config path
    Path,
}
