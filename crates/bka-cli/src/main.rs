use clap::Parser;

mod cli;
mod commands;
mod config;
mod shell;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::ShellConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config);
    commands::run_command(cli, config)
}

fn init_tracing(verbose: bool, config: &config::ShellConfig) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        config.tracing_level()
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
