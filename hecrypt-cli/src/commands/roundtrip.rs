use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use colored::Colorize;
use hecrypt_core::{ErrorReport, MethodOutcome, MethodRequest, Orchestrator, SchemeId};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use super::Context;
use crate::output::{format_bytes, print_json};

#[derive(Args)]
pub struct RoundtripArgs {
    /// UTF-8 text file to encrypt and decrypt again
    pub file: PathBuf,
    /// `all`, a scheme tag, or a comma-separated list
    #[arg(long, short)]
    pub method: Option<String>,
}

/// Outcome of encrypt → package → unpackage → decrypt for one method
#[derive(Debug, Serialize)]
pub struct RoundtripRow {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    pub encryption_time: f64,
    pub decryption_time: f64,
    pub ciphertext_size: usize,
    pub artifact_size: usize,
    /// Decrypted text equals the input
    pub matches: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl RoundtripRow {
    fn failed(method: &str, error: ErrorReport) -> Self {
        Self {
            method: method.to_string(),
            exact: method.parse::<SchemeId>().ok().map(|id| id.is_exact()),
            encryption_time: 0.0,
            decryption_time: 0.0,
            ciphertext_size: 0,
            artifact_size: 0,
            matches: false,
            error: Some(error),
        }
    }
}

pub async fn run(args: RoundtripArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let request = MethodRequest::parse(args.method.as_deref())?;

    let orchestrator = ctx.build_orchestrator(&config.schemes, &request)?;
    let rows = roundtrip(&orchestrator, &content, &request)?;

    if ctx.json_output {
        return print_json(&rows);
    }

    println!(
        "{:<9} {:>10} {:>10} {:>12} {:>12}  result",
        "method", "encrypt", "decrypt", "ciphertext", "artifact"
    );
    for row in &rows {
        let result = match (&row.error, row.matches) {
            (Some(e), _) => format!("{}: {}", e.kind, e.message).red(),
            (None, true) => "match".green(),
            (None, false) => "MISMATCH".red().bold(),
        };
        println!(
            "{:<9} {:>9.3}s {:>9.3}s {:>12} {:>12}  {result}",
            row.method,
            row.encryption_time,
            row.decryption_time,
            format_bytes(row.ciphertext_size),
            format_bytes(row.artifact_size),
        );
    }

    if rows.iter().any(|r| !r.matches) {
        anyhow::bail!("Round trip failed for at least one method");
    }
    Ok(())
}

/// Encrypt under every requested method, then decrypt each persisted artifact
pub fn roundtrip(
    orchestrator: &Orchestrator,
    content: &str,
    request: &MethodRequest,
) -> Result<Vec<RoundtripRow>> {
    let batch = orchestrator.run(content, request)?;

    let rows = batch
        .methods
        .iter()
        .map(|(tag, outcome)| {
            let result = match outcome {
                MethodOutcome::Success(result) => result,
                MethodOutcome::Failed { error } => return RoundtripRow::failed(tag, error.clone()),
            };

            let artifact = match result.package() {
                Ok(artifact) => artifact,
                Err(e) => return RoundtripRow::failed(tag, e.report()),
            };

            let start = Instant::now();
            let decrypted = orchestrator.run_decrypt_packaged(tag, &artifact);
            let decryption_time = start.elapsed().as_secs_f64();

            let (matches, error) = match decrypted {
                Ok(text) => (text == content, None),
                Err(e) => (false, Some(e.report())),
            };

            RoundtripRow {
                method: tag.clone(),
                exact: Some(result.method.is_exact()),
                encryption_time: result.elapsed.as_secs_f64(),
                decryption_time,
                ciphertext_size: result.size,
                artifact_size: artifact.len(),
                matches,
                error,
            }
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecrypt_core::{ContextManager, ErrorKind, SchemesConfig};
    use std::sync::Arc;

    fn orchestrator(schemes: SchemesConfig) -> Orchestrator {
        Orchestrator::new(Arc::new(ContextManager::initialize(&schemes).unwrap()))
    }

    #[test]
    fn test_every_method_matches() {
        let orchestrator = orchestrator(SchemesConfig::insecure_fast());
        let rows = roundtrip(&orchestrator, "Round trip ✓", &MethodRequest::All).unwrap();

        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row.matches, "{row:?}");
            assert!(row.error.is_none());
            assert!(row.artifact_size > 0);
        }
        let ckks = rows.iter().find(|r| r.method == "ckks").unwrap();
        assert_eq!(ckks.exact, Some(false));
    }

    #[test]
    fn test_encrypt_only_context_reports_key_unavailable() {
        let mut schemes = SchemesConfig::insecure_fast();
        schemes.paillier.decrypt = false;
        let orchestrator = orchestrator(schemes);

        let rows = roundtrip(&orchestrator, "AB", &MethodRequest::parse(Some("paillier,rsa")).unwrap())
            .unwrap();

        let paillier = rows.iter().find(|r| r.method == "paillier").unwrap();
        assert!(!paillier.matches);
        assert_eq!(paillier.error.as_ref().unwrap().kind, ErrorKind::KeyUnavailable);

        let rsa = rows.iter().find(|r| r.method == "rsa").unwrap();
        assert_eq!(rsa.exact, None);
        assert_eq!(rsa.error.as_ref().unwrap().kind, ErrorKind::InvalidInput);
    }
}
