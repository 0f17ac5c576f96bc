use anyhow::Context as _;
use clap::Args;
use kube_ai_core::clean::trim_response;
use kube_ai_core::prompt::{self, PromptPair};
use std::path::PathBuf;

use super::display_path;
use crate::context::Context;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// A question such as "How do I debug a pod in CrashLoopBackOff?"
    pub question: Option<String>,

    /// Path to a Kubernetes manifest file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

pub fn run(ctx: &Context, args: SuggestArgs) -> anyhow::Result<()> {
    let client = ctx.completer()?;
    let pair = build_prompt(ctx, &args)?;
    let completion = ctx.ask(&client, pair)?;
    ctx.print_answer(
        "suggest",
        "🤖 Suggested kubectl command(s):",
        &completion,
        trim_response(&completion.text),
    )
}

pub(crate) fn build_prompt(ctx: &Context, args: &SuggestArgs) -> anyhow::Result<PromptPair> {
    let question = args
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());
    ctx.record(
        "suggest",
        &format!(
            "file={} question={}",
            display_path(&args.file),
            question.unwrap_or("")
        ),
    );

    if let Some(path) = &args.file {
        let manifest = kube_ai_core::io::read_text(path)
            .with_context(|| format!("failed to read file {}", path.display()))?;
        return Ok(prompt::suggest_for_manifest(&manifest));
    }
    match question {
        Some(q) => Ok(prompt::suggest_for_question(q)),
        None => anyhow::bail!("please provide a question or a file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context_in;
    use tempfile::TempDir;

    #[test]
    fn file_takes_precedence_over_question() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(&path, "kind: Job").unwrap();
        let ctx = context_in(dir.path());
        let args = SuggestArgs {
            question: Some("ignored".into()),
            file: Some(path),
        };
        let pair = build_prompt(&ctx, &args).unwrap();
        assert!(pair.user.starts_with("This is a Kubernetes manifest:"));
        assert!(pair.user.contains("kind: Job"));
    }

    #[test]
    fn neither_question_nor_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context_in(dir.path());
        let args = SuggestArgs {
            question: Some("   ".into()),
            file: None,
        };
        assert!(build_prompt(&ctx, &args).is_err());
    }
}
