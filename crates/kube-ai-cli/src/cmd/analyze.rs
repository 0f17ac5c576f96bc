use clap::Args;
use kube_ai_core::clean::trim_response;
use kube_ai_core::prompt::{self, PromptPair};

use super::{join_words, Fetch, SourceArgs};
use crate::context::Context;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Question to answer about the resource
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(ctx: &Context, args: AnalyzeArgs) -> anyhow::Result<()> {
    let client = ctx.completer()?;
    let pair = build_prompt(ctx, &args)?;
    let completion = ctx.ask(&client, pair)?;
    ctx.print_answer(
        "analyze",
        "🤖 AI Analysis:",
        &completion,
        trim_response(&completion.text),
    )
}

pub(crate) fn build_prompt(ctx: &Context, args: &AnalyzeArgs) -> anyhow::Result<PromptPair> {
    let question = join_words(&args.question).unwrap_or_default();
    ctx.record(
        "analyze",
        &format!("{} question={question}", args.source.describe()),
    );

    let Some(data) = args.source.load(ctx, Fetch::Get)? else {
        anyhow::bail!("please provide either --file or both --name and --ns");
    };
    Ok(prompt::analyze(&data, &question))
}
