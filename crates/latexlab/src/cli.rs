//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "latexlab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./latexlab.toml when present)
    #[arg(short, long, global = true, env = "LATEXLAB_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand a template into LaTeX source
    Render {
        /// Template file, or a template name under `templates.dir`
        template: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Write the source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expand a template and compile it until the log is stable
    Compile {
        /// Template file, or a template name under `templates.dir`
        template: PathBuf,

        /// Where to write the compiled artifact
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Engine command (overrides `engine.default`)
        #[arg(short, long)]
        engine: Option<String>,

        /// Maximum number of engine passes
        #[arg(long)]
        max_passes: Option<u32>,

        /// Kill an engine pass after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Check environment health
    Doctor {
        #[arg(long)]
        json: bool,
    },
}

/// Template bindings given on the command line
#[derive(Args, Debug, Default)]
pub struct DataArgs {
    /// Bindings file (.toml or .json)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Extra string binding; dotted keys create tables
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}
