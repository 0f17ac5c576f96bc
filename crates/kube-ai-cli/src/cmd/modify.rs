use anyhow::Context as _;
use clap::Args;
use kube_ai_core::manifest::{self, Overrides};
use std::path::PathBuf;

use crate::context::Context;
use crate::output::print_json;

#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// YAML file to modify in place
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// New namespace to set
    #[arg(long)]
    pub namespace: Option<String>,

    /// New metadata name to set
    #[arg(long)]
    pub name: Option<String>,

    /// New replica count to set (0 = leave unchanged)
    #[arg(long, default_value_t = 0)]
    pub replicas: u32,
}

/// Patch namespace/name/replicas in every document of the file. Changes are
/// not applied to the cluster; `kube-ai execute` does that.
pub fn run(ctx: &Context, args: ModifyArgs) -> anyhow::Result<()> {
    ctx.record(
        "modify",
        &format!(
            "file={} ns={} name={} replicas={}",
            args.file.display(),
            args.namespace.as_deref().unwrap_or(""),
            args.name.as_deref().unwrap_or(""),
            args.replicas
        ),
    );

    let overrides = Overrides::new(args.namespace, args.name, Some(args.replicas));
    if overrides.is_empty() {
        tracing::warn!("no overrides given; the file will only be re-serialized");
    }

    let report = manifest::modify_file(&args.file, &overrides)
        .with_context(|| format!("failed to update {}", args.file.display()))?;

    if ctx.json {
        return print_json(&report);
    }

    println!("✅ YAML updated successfully: {}", args.file.display());
    println!(
        "👉 If you want to apply it, run: kube-ai execute --file {}",
        args.file.display()
    );
    Ok(())
}
