use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use confmig::cli::{Cli, Commands};
use confmig::output::{self, Verbosity};
use confmig::{MigrationContext, commands};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    output::set_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose));

    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    let ctx = MigrationContext::new(cli.settings)?;
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        ctx.settings.logging.level.as_str()
    };
    init_tracing(level);

    match cli.command {
        Commands::Migrate {
            config_path,
            to,
            overwrite,
        } => {
            commands::migrate::execute(&ctx, &config_path, to, overwrite)?;
        }
        Commands::Single {
            base_path,
            modifications,
            output_folder,
            index,
        } => {
            commands::single::execute(&ctx, &base_path, &modifications, &output_folder, index)?;
        }
        Commands::Combinations {
            base_path,
            modifications,
            output_folder,
        } => {
            commands::combinations::execute(&ctx, &base_path, &modifications, &output_folder)?;
        }
        Commands::Versions => commands::versions::execute(&ctx)?,
        Commands::Completion { .. } => {}
    }

    Ok(())
}

/// `CONFMIG_LOG` overrides `level`.
fn init_tracing(level: &str) {
    let filter =
        EnvFilter::try_from_env(confmig::LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
