use clap::Args;
use kube_ai_core::clean::trim_response;
use kube_ai_core::prompt::{self, PromptPair};

use super::{join_words, Fetch, SourceArgs};
use crate::context::Context;

#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Optional question about the failing workload
    pub question: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(ctx: &Context, args: DiagnoseArgs) -> anyhow::Result<()> {
    let client = ctx.completer()?;
    let pair = build_prompt(ctx, &args)?;
    let completion = ctx.ask(&client, pair)?;
    ctx.print_answer(
        "diagnose",
        "🛠️ Diagnosis from AI:",
        &completion,
        trim_response(&completion.text),
    )
}

/// Live resources are read with `kubectl describe`, which carries the events
/// and container states a diagnosis needs.
pub(crate) fn build_prompt(ctx: &Context, args: &DiagnoseArgs) -> anyhow::Result<PromptPair> {
    let question = join_words(&args.question);
    ctx.record(
        "diagnose",
        &format!(
            "{} question={}",
            args.source.describe(),
            question.as_deref().unwrap_or("")
        ),
    );

    let data = args.source.load(ctx, Fetch::Describe)?;
    if data.is_none() && question.is_none() {
        anyhow::bail!(
            "please provide a file (-f), a resource (--name and --ns), or a direct question"
        );
    }
    Ok(prompt::diagnose(
        data.as_deref().unwrap_or(""),
        question.as_deref(),
    ))
}
