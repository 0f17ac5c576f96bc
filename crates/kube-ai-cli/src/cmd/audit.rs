use clap::Args;
use kube_ai_core::clean::trim_response;
use kube_ai_core::prompt::{self, PromptPair};

use super::{join_words, Fetch, SourceArgs};
use crate::context::Context;

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Optional question or focus for the audit
    pub question: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(ctx: &Context, args: AuditArgs) -> anyhow::Result<()> {
    let client = ctx.completer()?;
    let pair = build_prompt(ctx, &args)?;
    let completion = ctx.ask(&client, pair)?;
    ctx.print_answer(
        "audit",
        "🔍 AI Audit Result:",
        &completion,
        trim_response(&completion.text),
    )
}

pub(crate) fn build_prompt(ctx: &Context, args: &AuditArgs) -> anyhow::Result<PromptPair> {
    let question = join_words(&args.question);
    ctx.record(
        "audit",
        &format!(
            "{} question={}",
            args.source.describe(),
            question.as_deref().unwrap_or("")
        ),
    );

    let data = args.source.load(ctx, Fetch::Get)?;
    if data.is_none() && question.is_none() {
        anyhow::bail!("please provide a file (-f), a resource (--name and --ns), or a question");
    }
    Ok(prompt::audit(
        data.as_deref().unwrap_or(""),
        question.as_deref(),
    ))
}
