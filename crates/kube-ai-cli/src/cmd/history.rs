use anyhow::Context as _;

use crate::context::Context;
use crate::output::print_json;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let history = ctx
        .history()
        .ok_or(kube_ai_core::KubeAiError::HomeNotFound)
        .context("could not locate the history file")?;

    if ctx.json {
        let entries = history.entries().context("failed to read history")?;
        return print_json(&entries);
    }

    match history.read().context("failed to read history")? {
        Some(text) if !text.trim().is_empty() => {
            println!("📜 Command History:");
            println!("{}", text.trim_end());
        }
        _ => println!("ℹ️ No history found yet."),
    }
    Ok(())
}
