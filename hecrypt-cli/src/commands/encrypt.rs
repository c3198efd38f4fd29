use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use hecrypt_core::packager::artifact_name;
use hecrypt_core::{BatchResult, ErrorReport, MethodRequest, SchemeId};
use hecrypt_storage::{UploadOutcome, UploadReport, Uploader};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Context;
use crate::output::{format_bytes, print_error, print_info, print_json, print_success, print_warning};

#[derive(Args)]
pub struct EncryptArgs {
    /// UTF-8 text file to encrypt
    pub file: PathBuf,
    /// `all`, a scheme tag, or a comma-separated list
    #[arg(long, short)]
    pub method: Option<String>,
    /// Where artifacts are written (default: next to the input)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Also upload every artifact to the configured storage
    #[arg(long)]
    pub upload: bool,
    /// Storage token for this run
    #[arg(long, env = "DROPBOX_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// One artifact written to disk
#[derive(Debug, Serialize)]
pub struct Artifact {
    pub method: SchemeId,
    pub path: PathBuf,
    pub ciphertext_size: usize,
    pub artifact_size: usize,
    pub encryption_time: f64,
    #[serde(skip)]
    pub data: Vec<u8>,
}

#[derive(Serialize)]
struct Output {
    input: PathBuf,
    artifacts: Vec<Artifact>,
    failures: BTreeMap<String, ErrorReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    uploads: Vec<UploadReport>,
}

pub async fn run(args: EncryptArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let request = MethodRequest::parse(args.method.as_deref())?;

    let orchestrator = ctx.build_orchestrator(&config.schemes, &request)?;
    let batch = orchestrator.run(&content, &request)?;

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => args
            .file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let filename = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("{} has no file name", args.file.display()))?;

    let artifacts = write_artifacts(&output_dir, &filename, &batch)?;

    let uploads = if args.upload {
        let uploader = Uploader::from_config(config.storage.clone()).await?;
        let payloads: Vec<(String, Vec<u8>)> = artifacts
            .iter()
            .map(|a| (artifact_name(&filename, a.method), a.data.clone()))
            .collect();
        uploader.upload_all(args.token.as_deref(), &payloads).await
    } else {
        Vec::new()
    };

    let failures: BTreeMap<String, ErrorReport> = batch
        .failures()
        .map(|(tag, report)| (tag.to_string(), report.clone()))
        .collect();

    if ctx.json_output {
        return print_json(&Output {
            input: args.file,
            artifacts,
            failures,
            uploads,
        });
    }

    for artifact in &artifacts {
        print_success(format!(
            "{:<9} → {} ({} ciphertext, {} on disk, {:.3}s)",
            artifact.method.to_string(),
            artifact.path.display(),
            format_bytes(artifact.ciphertext_size),
            format_bytes(artifact.artifact_size),
            artifact.encryption_time
        ));
    }
    for (tag, report) in &failures {
        print_error(format!("{tag:<9} {}: {}", report.kind, report.message));
    }
    for report in &uploads {
        match &report.outcome {
            UploadOutcome::Uploaded(stored) => print_success(format!(
                "uploaded {} to {} ({} attempt{})",
                stored.path,
                stored.backend,
                report.attempts,
                if report.attempts == 1 { "" } else { "s" }
            )),
            UploadOutcome::Failed { error, .. } => print_error(format!(
                "upload of {} failed after {} attempt(s): {error}",
                report.path, report.attempts
            )),
            UploadOutcome::Skipped { reason } => {
                print_warning(format!("upload of {} skipped: {reason}", report.path))
            }
        }
    }
    if ctx.verbose {
        print_info(format!(
            "{} of {} method(s) succeeded",
            artifacts.len(),
            batch.len()
        ));
    }

    if artifacts.is_empty() {
        anyhow::bail!("No method succeeded");
    }
    Ok(())
}

/// Write one compressed artifact per successful method
pub fn write_artifacts(dir: &Path, filename: &str, batch: &BatchResult) -> Result<Vec<Artifact>> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    batch
        .successes()
        .map(|result| -> Result<Artifact> {
            let data = result.package()?;
            let path = dir.join(artifact_name(filename, result.method));
            fs::write(&path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(method = %result.method, path = %path.display(), "artifact written");
            Ok(Artifact {
                method: result.method,
                path,
                ciphertext_size: result.size,
                artifact_size: data.len(),
                encryption_time: result.elapsed.as_secs_f64(),
                data,
            })
        })
        .collect()
}
