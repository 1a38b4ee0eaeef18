use std::io::{BufRead, Write};

use bka_crypto::Signer;
use bka_ledger::{
    Block, ChainValidator, Credential, CredentialRecord, CredentialVerifier, LedgerReader,
    LedgerWriter, ValidationReport, Verdict,
};
use bka_types::CredentialKind;
use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Fields the operator supplies for a new credential.
#[derive(Clone, Debug)]
pub struct IssueRequest {
    pub student_id: String,
    pub student_name: String,
    pub program: String,
    pub specialization: String,
    pub kind: CredentialKind,
}

#[derive(Serialize)]
struct IssueOutput<'a> {
    block_index: u64,
    credential: &'a CredentialRecord,
}

#[derive(Serialize)]
struct VerifyOutput<'a> {
    student_id: &'a str,
    verdict: Verdict,
    record: Option<&'a CredentialRecord>,
    record_count: usize,
}

/// One issuer working against one ledger.
///
/// Both are handed in by the caller; the shell owns prompting and printing
/// only.
pub struct Session<L> {
    ledger: L,
    issuer: Signer,
    format: OutputFormat,
    preview_len: usize,
}

impl<L: LedgerReader + LedgerWriter> Session<L> {
    pub fn new(ledger: L, issuer: Signer, format: OutputFormat, preview_len: usize) -> Self {
        Self {
            ledger,
            issuer,
            format,
            preview_len,
        }
    }

    pub fn issuer(&self) -> &Signer {
        &self.issuer
    }

    /// Build, sign, stage, and mint a single credential.
    pub fn issue(&self, request: IssueRequest) -> anyhow::Result<(Credential, Block)> {
        let credential = Credential::issue(
            request.student_id,
            request.student_name,
            request.program,
            request.specialization,
            request.kind,
            &self.issuer,
        );
        self.ledger.stage_pending(credential.to_record())?;
        let block = self.ledger.mint()?;
        Ok((credential, block))
    }

    /// Every record issued to `student_id`, earliest first, and the verdict
    /// for the earliest one.
    pub fn verify(&self, student_id: &str) -> anyhow::Result<(Vec<CredentialRecord>, Verdict)> {
        let history = self.ledger.find_all_by_subject(student_id)?;
        let verdict =
            CredentialVerifier::verify(&self.ledger, &self.issuer.verifying_key(), student_id)?;
        Ok((history, verdict))
    }

    pub fn check(&self) -> anyhow::Result<ValidationReport> {
        Ok(ChainValidator::validate(&self.ledger)?)
    }

    /// Drive the interactive menu until the operator exits or input ends.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> anyhow::Result<()> {
        writeln!(
            out,
            "{}",
            "BlockAcademia – Academic Credential & Micro-Cert Verification".bold()
        )?;
        writeln!(
            out,
            "Issuer: {} (key {})",
            self.issuer.name().cyan(),
            self.issuer.verifying_key().fingerprint()
        )?;

        loop {
            writeln!(out, "\n=========== MENU ===========")?;
            writeln!(out, "1. Issue new credential")?;
            writeln!(out, "2. Verify credential")?;
            writeln!(out, "3. Check chain validity")?;
            writeln!(out, "4. Show chain")?;
            writeln!(out, "5. Exit")?;
            let Some(choice) = prompt(&mut input, out, "Select an option: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => {
                    if !self.issue_flow(&mut input, out)? {
                        break;
                    }
                }
                "2" => {
                    let Some(student_id) = prompt(&mut input, out, "Student ID to verify: ")?
                    else {
                        break;
                    };
                    let (history, verdict) = self.verify(&student_id)?;
                    self.render_verification(out, &student_id, &history, verdict)?;
                }
                "3" => {
                    let report = self.check()?;
                    self.render_report(out, &report)?;
                }
                "4" => {
                    let blocks = self.ledger.blocks()?;
                    self.render_chain(out, &blocks)?;
                }
                "5" => {
                    writeln!(out, "Goodbye.")?;
                    break;
                }
                _ => writeln!(out, "{}", "Invalid choice. Please enter 1–5.".yellow())?,
            }
        }
        Ok(())
    }

    /// Returns `false` if input ended mid-flow.
    fn issue_flow<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> anyhow::Result<bool> {
        writeln!(out, "\n--- ISSUE NEW CREDENTIAL ---")?;
        let mut answers: [String; 5] = Default::default();
        let questions = [
            "Student ID: ",
            "Student Name: ",
            "Program (e.g., MITS): ",
            "Specialization (e.g., AI): ",
            "Credential type (Degree/Micro-cert): ",
        ];
        for (slot, question) in answers.iter_mut().zip(questions) {
            match prompt(input, out, question)? {
                Some(answer) => *slot = answer,
                None => return Ok(false),
            }
        }

        let [student_id, student_name, program, specialization, kind] = answers;
        let kind = match kind.parse::<CredentialKind>() {
            Ok(kind) => kind,
            Err(err) => {
                writeln!(out, "{} {err}", "✗".red())?;
                return Ok(true);
            }
        };
        let request = IssueRequest {
            student_id,
            student_name,
            program,
            specialization,
            kind,
        };

        let (credential, block) = self.issue(request)?;
        self.render_issued(out, &credential.to_record(), &block)?;
        Ok(true)
    }

    pub fn render_issued<W: Write>(
        &self,
        out: &mut W,
        record: &CredentialRecord,
        block: &Block,
    ) -> anyhow::Result<()> {
        if self.format == OutputFormat::Json {
            let output = IssueOutput {
                block_index: block.index,
                credential: record,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            return Ok(());
        }

        writeln!(out, "{} Credential issued", "✓".green().bold())?;
        writeln!(out, "  Block index: {}", block.index.to_string().yellow())?;
        writeln!(out, "  Credential hash: {}", record.hash)?;
        if let Some(signature) = &record.signature {
            writeln!(
                out,
                "  Digital signature (truncated): {}...",
                self.preview(signature)
            )?;
        }
        Ok(())
    }

    pub fn render_verification<W: Write>(
        &self,
        out: &mut W,
        student_id: &str,
        history: &[CredentialRecord],
        verdict: Verdict,
    ) -> anyhow::Result<()> {
        let record = history.first();
        if self.format == OutputFormat::Json {
            let output = VerifyOutput {
                student_id,
                verdict,
                record,
                record_count: history.len(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            return Ok(());
        }

        if let Some(record) = record {
            writeln!(out, "\nCredential found on chain:")?;
            writeln!(out, "  student_id: {}", record.student_id)?;
            writeln!(out, "  student_name: {}", record.student_name)?;
            writeln!(out, "  program: {}", record.program)?;
            writeln!(out, "  specialization: {}", record.specialization)?;
            writeln!(out, "  credential_type: {}", record.credential_type)?;
            writeln!(out, "  issuer_name: {}", record.issuer_name)?;
            writeln!(out, "  hash: {}...", self.preview(&record.hash))?;
            let signature = record.signature.as_deref().unwrap_or("(unsigned)");
            writeln!(out, "  signature: {}...", self.preview(signature))?;
            if history.len() > 1 {
                writeln!(
                    out,
                    "  ({} records on chain for this subject; the earliest is verified)",
                    history.len()
                )?;
            }
        }

        match verdict {
            Verdict::Valid => {
                writeln!(out, "\n{}", "✓ CREDENTIAL IS VALID".green().bold())?;
                writeln!(out, " - Data matches stored hash")?;
                writeln!(out, " - Digital signature verified with issuer's public key")?;
                writeln!(out, " - Blockchain links are consistent")?;
            }
            Verdict::ChainInvalid => {
                writeln!(out, "\n{} {verdict}", "⚠ WARNING:".yellow().bold())?;
            }
            _ => writeln!(out, "\n{} {verdict}", "✗ INVALID:".red().bold())?,
        }
        Ok(())
    }

    pub fn render_report<W: Write>(
        &self,
        out: &mut W,
        report: &ValidationReport,
    ) -> anyhow::Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
            return Ok(());
        }

        let status = if report.is_valid() {
            "valid".green()
        } else {
            "INVALID".red().bold()
        };
        writeln!(
            out,
            "\nBlockchain {status}: {} blocks, {} credentials",
            report.block_count, report.credential_count
        )?;
        for violation in &report.violations {
            writeln!(
                out,
                "  block {}: {:?} ({})",
                violation.index, violation.kind, violation.description
            )?;
        }
        Ok(())
    }

    pub fn render_chain<W: Write>(&self, out: &mut W, blocks: &[Block]) -> anyhow::Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(out, "{}", serde_json::to_string_pretty(blocks)?)?;
            return Ok(());
        }

        for block in blocks {
            writeln!(
                out,
                "{}  {}  prev {}  ({} credentials)",
                format!("#{}", block.index).yellow().bold(),
                self.preview(&block.hash).dimmed(),
                self.preview(&block.previous_hash),
                block.data.len()
            )?;
            for record in &block.data {
                writeln!(
                    out,
                    "    {} {} — {} {} ({})",
                    record.student_id, record.student_name, record.credential_type,
                    record.program, record.specialization
                )?;
            }
        }
        Ok(())
    }

    fn preview<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.preview_len) {
            Some((cut, _)) => &text[..cut],
            None => text,
        }
    }
}

/// Print `question` and read one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> anyhow::Result<Option<String>> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
