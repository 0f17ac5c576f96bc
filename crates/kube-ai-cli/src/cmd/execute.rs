use anyhow::Context as _;
use clap::Args;
use kube_ai_core::KubeAiError;
use std::path::PathBuf;

use crate::context::Context;
use crate::output::print_ruled;

#[derive(Args, Debug)]
pub struct ExecuteArgs {
    /// Path to the YAML manifest file to apply
    #[arg(short = 'f', long)]
    pub file: PathBuf,
}

/// Show the manifest, then `kubectl apply -f` it. The file is left in place.
pub fn run(ctx: &Context, args: ExecuteArgs) -> anyhow::Result<()> {
    ctx.record("execute", &format!("file={}", args.file.display()));

    if !args.file.exists() {
        return Err(KubeAiError::FileNotFound(args.file).into());
    }
    let content = kube_ai_core::io::read_text(&args.file)
        .with_context(|| format!("failed to read file '{}'", args.file.display()))?;
    let kubectl = ctx.kubectl()?;

    print_ruled("📄 YAML Content to Apply:", &content);
    println!("🚀 Applying manifest to the cluster...");

    kubectl
        .apply(&args.file)
        .context("failed to apply manifest")?;

    println!("✅ Resource applied successfully!");
    println!("📄 YAML remains at: {}", args.file.display());
    Ok(())
}
