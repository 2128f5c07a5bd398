use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::ENV_CONFIG;

#[derive(Parser)]
#[command(name = "sitekit")]
#[command(version)]
#[command(about = "Plan static-site hosting infrastructure per environment", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Site config file (default: site.toml)
    #[arg(short, long, global = true, env = ENV_CONFIG)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the resource intents for an environment
    Plan(PlanArgs),

    /// Write the plan as an assembly for the provisioning engine
    Synth(SynthArgs),

    /// Inspect and validate the site configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Environment selection and deployment target overrides
#[derive(Args, Debug, Clone)]
pub struct EnvArgs {
    /// Environment to resolve (dev, staging, prod)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Deployment account, overriding [target] in the config
    #[arg(long)]
    pub account: Option<String>,

    /// Deployment region, overriding [target] in the config
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Only show intents matching a kind or kind.id (e.g. "bucket", "dns_record.aliasRecord")
    #[arg(short, long)]
    pub target: Option<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SynthArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Output directory for the assembly
    #[arg(short, long, default_value = "site.out")]
    pub out: String,

    /// Show what would be written without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration for an environment
    Show {
        #[command(flatten)]
        env: EnvArgs,
    },

    /// List the configured environments
    Envs,

    /// Resolve every configured environment and report problems
    Validate,

    /// Write a starter config file
    Init,
}
