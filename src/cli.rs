use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brandcheck")]
#[command(
    version,
    about = "Brand Compliance Checker - Score designs against brand kits",
    long_about = "Brand Compliance Checker\n\nModes:\n- check: score a design (JSON/YAML element tree) against a brand kit.\n- fix: rewrite off-brand colors and fonts onto the nearest brand values.\n- kit: create, list, update and delete brand kits.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for thresholds, weights, store and audit settings; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

/// Where the brand kit comes from: the kit store or a standalone file.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("kit_source").required(true).args(["kit", "kit_file"])))]
pub struct KitSource {
    #[arg(long, help = "Brand kit id in the kit store")]
    pub kit: Option<String>,

    #[arg(long, value_name = "PATH", help = "Brand kit JSON/YAML file")]
    pub kit_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Kit store file (overrides [store].path)")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a design against a brand kit
    Check {
        #[arg(long, value_name = "PATH", help = "Design element tree (JSON or YAML)")]
        design: PathBuf,

        #[command(flatten)]
        source: KitSource,

        #[arg(long, help = "Project id recorded with the audit entry")]
        project: Option<String>,

        #[arg(
            long,
            default_value = "0",
            help = "Minimum score for a passing check (0-1); failing checks exit with 1"
        )]
        min_score: f64,

        #[arg(long, help = "Skip writing the audit record")]
        no_audit: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Rewrite off-brand colors and fonts onto brand values
    Fix {
        #[arg(long, value_name = "PATH", help = "Design element tree (JSON or YAML)")]
        design: PathBuf,

        #[command(flatten)]
        source: KitSource,

        #[arg(
            long,
            value_name = "PATH",
            help = "Write the fixed design (JSON) to this file; the report is printed either way"
        )]
        write: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Manage brand kits
    Kit {
        #[arg(long, value_name = "PATH", global = true, help = "Kit store file (overrides [store].path)")]
        store: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", global = true, help = "Output format")]
        format: OutputFormat,

        #[command(subcommand)]
        action: KitAction,
    },
}

#[derive(Subcommand)]
pub enum KitAction {
    /// Create a kit from a JSON/YAML draft
    Create {
        #[arg(long, help = "Owner (user or workspace) id")]
        owner: String,
        #[arg(long, value_name = "PATH", help = "Kit draft file")]
        from: PathBuf,
        #[arg(long, help = "Make this the owner's default kit")]
        default: bool,
    },
    /// List an owner's kits
    List {
        #[arg(long, help = "Owner (user or workspace) id")]
        owner: String,
    },
    /// Show one kit
    Show { id: String },
    /// Apply a JSON/YAML patch to a kit
    Update {
        id: String,
        #[arg(long, value_name = "PATH", help = "Patch file")]
        from: PathBuf,
    },
    /// Delete a kit
    Delete { id: String },
    /// Make a kit its owner's default
    SetDefault { id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
