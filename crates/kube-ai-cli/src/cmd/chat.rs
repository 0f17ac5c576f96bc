use anyhow::Context as _;
use clap::Args;
use kube_ai_core::clean::trim_response;
use kube_ai_core::prompt::{self, PromptPair};
use std::path::{Path, PathBuf};

use super::{display_path, join_words};
use crate::context::Context;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Your question
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Optional YAML file to use as context
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

pub fn run(ctx: &Context, args: ChatArgs) -> anyhow::Result<()> {
    let client = ctx.completer()?;
    let pair = build_prompt(ctx, &args)?;
    let completion = ctx.ask(&client, pair)?;
    ctx.print_answer(
        "chat",
        "🤖 AI Kubernetes Assistant:",
        &completion,
        trim_response(&completion.text),
    )
}

pub(crate) fn build_prompt(ctx: &Context, args: &ChatArgs) -> anyhow::Result<PromptPair> {
    let question = join_words(&args.question).unwrap_or_default();
    ctx.record(
        "chat",
        &format!("file={} question={question}", display_path(&args.file)),
    );

    let yaml = match &args.file {
        Some(path) => Some(
            kube_ai_core::io::read_text(path)
                .with_context(|| format!("failed to read file {}", path.display()))?,
        ),
        None => referenced_yaml(&question),
    };
    Ok(prompt::chat(&question, yaml.as_deref()))
}

/// Contents of a YAML file named in the question, if it exists and is readable.
fn referenced_yaml(question: &str) -> Option<String> {
    let name = prompt::detect_yaml_reference(question)?;
    let path = Path::new(name);
    if !path.is_file() {
        tracing::debug!(file = name, "referenced YAML file not found; ignoring");
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(file = name, "using referenced YAML file as context");
            Some(text)
        }
        Err(e) => {
            tracing::debug!(file = name, error = %e, "could not read referenced YAML file");
            None
        }
    }
}
