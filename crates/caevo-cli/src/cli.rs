//! CLI command definitions and argument parsing.

use caevo_domain::RelationMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Caevo - Temporal relation extraction with sieves and transitive closure.
#[derive(Debug, Parser)]
#[command(name = "caevo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one link per line)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the relation vocabulary with inverses and reductions
    Relations,

    /// Infer the links implied by a link file
    Closure(ClosureArgs),

    /// Collapse the relations of a link file to a coarser mode
    Reduce(ReduceArgs),

    /// Run the sieve pipeline over a corpus of documents
    Run(RunArgs),
}

/// Arguments for the closure command.
#[derive(Debug, Parser)]
pub struct ClosureArgs {
    /// JSON file holding an array of link records
    pub input: PathBuf,

    /// Rule file replacing the derived composition table
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Treat every relation mismatch as a conflict
    #[arg(long)]
    pub strict: bool,

    /// Print the input links along with the inferred ones
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the reduce command.
#[derive(Debug, Parser)]
pub struct ReduceArgs {
    /// JSON file holding an array of link records
    pub input: PathBuf,

    /// Target mode: full, reduced, basic, symmetry, before, tempeval
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: RelationMode,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// JSON file holding an array of documents
    pub input: PathBuf,

    /// Pipeline configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Built-in configuration used when no file is given
    #[arg(short, long, value_enum, default_value = "default")]
    pub preset: PresetArg,

    /// Write annotated documents here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Score the output against the links already in the input
    #[arg(short, long)]
    pub evaluate: bool,
}

/// Pipeline preset argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Rule sieves with closure
    Default,
    /// Strict closure, confident classifier links only
    Precise,
    /// Every sieve, ending with the vague fallback
    Exhaustive,
}

impl From<PresetArg> for caevo_sieve::PipelineConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => caevo_sieve::PipelineConfig::default(),
            PresetArg::Precise => caevo_sieve::PipelineConfig::precise(),
            PresetArg::Exhaustive => caevo_sieve::PipelineConfig::exhaustive(),
        }
    }
}

fn parse_mode(value: &str) -> Result<RelationMode, String> {
    value.parse().map_err(|e: caevo_domain::ParseError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_command() {
        let cli = Cli::parse_from(["caevo", "closure", "links.json", "--strict"]);
        match cli.command {
            Command::Closure(args) => {
                assert!(args.strict);
                assert_eq!(args.input, PathBuf::from("links.json"));
            }
            _ => panic!("Expected Closure command"),
        }
    }

    #[test]
    fn test_reduce_mode_parsing() {
        let cli = Cli::parse_from(["caevo", "reduce", "links.json", "--mode", "tempeval"]);
        match cli.command {
            Command::Reduce(args) => assert_eq!(args.mode, RelationMode::Tempeval),
            _ => panic!("Expected Reduce command"),
        }
        assert!(Cli::try_parse_from(["caevo", "reduce", "links.json", "--mode", "coarse"]).is_err());
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["caevo", "--format", "json", "run", "docs.json", "--evaluate"]);
        assert_eq!(cli.format, CliFormat::Json);
        match cli.command {
            Command::Run(args) => {
                assert!(args.evaluate);
                assert_eq!(args.preset, PresetArg::Default);
                assert!(args.config.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_preset_conversion() {
        let config: caevo_sieve::PipelineConfig = PresetArg::Exhaustive.into();
        assert_eq!(config, caevo_sieve::PipelineConfig::exhaustive());
    }
}
