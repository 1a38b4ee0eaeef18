use std::io::Write;

use bka_crypto::Signer;
use bka_ledger::InMemoryLedger;

use crate::cli::*;
use crate::config::ShellConfig;
use crate::shell::{IssueRequest, Session};

pub fn run_command(cli: Cli, config: ShellConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Shell(args) => cmd_shell(args, cli.format, &config),
        Command::Demo(args) => cmd_demo(args, cli.format, &config),
    }
}

fn new_session(
    issuer: Option<String>,
    format: OutputFormat,
    config: &ShellConfig,
) -> anyhow::Result<Session<InMemoryLedger>> {
    let issuer = Signer::generate(config.issuer_or(issuer));
    tracing::info!(issuer = issuer.name(), key = %issuer.verifying_key().fingerprint(), "issuer key generated");
    Ok(Session::new(InMemoryLedger::new()?, issuer, format, config.preview_len))
}

fn cmd_shell(args: ShellArgs, format: OutputFormat, config: &ShellConfig) -> anyhow::Result<()> {
    let session = new_session(args.issuer, format, config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    session.run(stdin.lock(), &mut stdout)
}

fn cmd_demo(args: DemoArgs, format: OutputFormat, config: &ShellConfig) -> anyhow::Result<()> {
    let session = new_session(args.issuer, format, config)?;
    let mut out = std::io::stdout().lock();
    demo(&session, IssueRequest {
        student_id: args.student_id,
        student_name: args.name,
        program: args.program,
        specialization: args.specialization,
        kind: args.kind,
    }, &mut out)
}

/// Issue one credential, verify it, then check the chain.
fn demo<W: Write>(
    session: &Session<InMemoryLedger>,
    request: IssueRequest,
    out: &mut W,
) -> anyhow::Result<()> {
    let student_id = request.student_id.clone();
    let (credential, block) = session.issue(request)?;
    session.render_issued(out, &credential.to_record(), &block)?;

    let (history, verdict) = session.verify(&student_id)?;
    session.render_verification(out, &student_id, &history, verdict)?;

    let report = session.check()?;
    session.render_report(out, &report)
}
