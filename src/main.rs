mod cli;
mod commands;
mod config;
mod paths;
mod progress;
mod schema;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub key: Option<String>,
    pub token: Option<String>,
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
        quiet: cli.quiet,
        key: cli.key,
        token: cli.token,
    };

    match cli.command {
        Command::Create(args) => commands::create::run(&ctx, args),
        Command::Show(args) => commands::show::run(&ctx, args),
        Command::Update(args) => commands::update::run(&ctx, args),
        Command::Delete(args) => commands::delete::run(&ctx, args),
        Command::Plan(args) => commands::plan::run(&ctx, args),
        Command::Validate(args) => commands::plan::validate(&ctx, args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "trellis", &mut io::stdout());
            Ok(())
        }
    }
}
