mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{bounds, group, plan, viewport};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(cli: &Cli) -> anyhow::Result<slackmap::MapConfig> {
    match &cli.config {
        Some(path) => slackmap::MapConfig::from_json_file(path),
        None => Ok(slackmap::MapConfig::default()),
    }
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    match &cli.command {
        Commands::Plan(args) => plan::run(&config, args),
        Commands::Viewport(command) => viewport::run(&config, command),
        Commands::Bounds(args) => bounds::run(&config, args),
        Commands::Group(args) => group::run(&config, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
