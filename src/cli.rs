//! Command-line arguments.

use crate::config::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fnspec")]
#[command(about = "Extract function-type specifications from Go interfaces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Name of the interface to extract
    #[arg(short = 'c', long = "contract", alias = "interface")]
    pub contract: String,

    /// Directory searched recursively for the interface
    #[arg(short = 'p', long = "path", default_value = ".")]
    pub path: PathBuf,

    /// Target output name recorded in the specification
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Module path to assume when no go.mod is found
    #[arg(long = "module-path", env = "FNSPEC_MODULE_PATH")]
    pub module_path: Option<String>,

    /// Output format of the handoff document
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (default: nearest .fnspec.toml)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
