use anyhow::Result;
use colored::Colorize;
use hecrypt_core::MethodRequest;

use super::Context;
use crate::output::{print_info, print_json};

pub async fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let orchestrator = ctx.build_orchestrator(&config.schemes, &MethodRequest::All)?;
    let methods = orchestrator.contexts().info();

    if ctx.json_output {
        return print_json(&methods);
    }

    if methods.is_empty() {
        print_info("No schemes enabled");
        return Ok(());
    }

    for info in &methods {
        let exactness = if info.exact { "exact" } else { "approximate" };
        let decrypt = if info.can_decrypt {
            "decrypt".green()
        } else {
            "encrypt-only".yellow()
        };
        println!(
            "{:<9} {} ({exactness}, {decrypt})",
            info.method.to_string().bold(),
            info.name
        );
        let params: Vec<String> = info
            .parameters
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        println!("          {}  key {}", params.join(" ").dimmed(), info.key_id);
    }

    Ok(())
}
