mod assembly;
mod cli;
mod commands;
mod config;
mod error;
mod merge;
mod resolver;
mod schema;
mod site;
mod ui;
mod zones;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, ConfigCommand};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config_path: config::config_path(cli.config.as_deref()),
    };

    match cli.command {
        Command::Plan(args) => commands::plan::run(&ctx, &args),
        Command::Synth(args) => commands::synth::run(&ctx, &args),
        Command::Config(cmd) => match cmd {
            ConfigCommand::Show { env } => commands::config::show(&ctx, &env),
            ConfigCommand::Envs => commands::config::envs(&ctx),
            ConfigCommand::Validate => commands::config::validate(&ctx),
            ConfigCommand::Init => commands::config::init(&ctx),
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sitekit", &mut io::stdout());
            Ok(())
        }
    }
}
