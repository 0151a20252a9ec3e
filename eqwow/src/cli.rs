//! Root CLI structure for eqwow

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use eqwow_model::ObjectClass;

#[derive(Parser)]
#[command(name = "eqwow")]
#[command(about = "Convert EverQuest objects into World of Warcraft model data", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one or more source objects
    Convert(ConvertArgs),

    /// Convert a source object and display the resulting model as a tree
    Tree(TreeArgs),

    /// Print the default conversion configuration
    Config {
        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: DocumentFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Inputs shared by every command that runs a conversion
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Object properties file (JSON or YAML)
    #[arg(short, long)]
    pub properties: Option<PathBuf>,

    /// Conversion configuration file (JSON or YAML)
    #[arg(short, long, env = "EQWOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the object class from the properties file
    #[arg(long, value_enum)]
    pub class: Option<ClassArg>,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Source object files (JSON or YAML)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory to write converted models to as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Source object file (JSON or YAML)
    pub input: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Hide per-node metadata
    #[arg(long)]
    pub no_metadata: bool,

    /// Show metadata inline
    #[arg(long)]
    pub compact: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Directory to check texture references against
    #[arg(long)]
    pub textures: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassArg {
    Creature,
    StaticDoodad,
    Transport,
    EquipmentHeld,
    ParticleEmitter,
    SpellProjectile,
    ZoneModel,
    SoundInstance,
}

impl From<ClassArg> for ObjectClass {
    fn from(class: ClassArg) -> Self {
        match class {
            ClassArg::Creature => Self::Creature,
            ClassArg::StaticDoodad => Self::StaticDoodad,
            ClassArg::Transport => Self::Transport,
            ClassArg::EquipmentHeld => Self::EquipmentHeld,
            ClassArg::ParticleEmitter => Self::ParticleEmitter,
            ClassArg::SpellProjectile => Self::SpellProjectile,
            ClassArg::ZoneModel => Self::ZoneModel,
            ClassArg::SoundInstance => Self::SoundInstance,
        }
    }
}
