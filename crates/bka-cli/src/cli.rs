use std::path::PathBuf;

use bka_types::CredentialKind;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bka",
    about = "BlockAcademia — academic credential and micro-cert verification",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive issue / verify / chain-check menu
    Shell(ShellArgs),
    /// Issue one credential, verify it, and check the chain
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ShellArgs {
    /// Issuer name (overrides the configuration file)
    #[arg(long)]
    pub issuer: Option<String>,
}

#[derive(Args)]
pub struct DemoArgs {
    #[arg(long)]
    pub student_id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub program: String,
    #[arg(long)]
    pub specialization: String,
    #[arg(long, default_value = "Degree")]
    pub kind: CredentialKind,
    #[arg(long)]
    pub issuer: Option<String>,
}
