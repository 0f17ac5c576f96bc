use anyhow::Context as _;
use clap::Args;
use kube_ai_core::clean::clean_generated_yaml;
use kube_ai_core::manifest::Overrides;
use kube_ai_core::prompt;
use llm_client::Completer;
use std::path::{Path, PathBuf};

use super::{display_path, join_words};
use crate::context::Context;
use crate::output::{print_json, print_ruled};

pub const DEFAULT_OUTPUT: &str = "output.yaml";

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Description of the resources to generate
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,

    /// Save the generated YAML to a file
    #[arg(short, long)]
    pub save: bool,

    /// Output filename (implies --save; default: output.yaml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Namespace to ask for
    #[arg(long)]
    pub namespace: Option<String>,

    /// Replica count to ask for (0 = unspecified)
    #[arg(long, default_value_t = 0)]
    pub replicas: u32,

    /// metadata.name to ask for
    #[arg(long)]
    pub name: Option<String>,
}

impl GenerateArgs {
    fn overrides(&self) -> Overrides {
        Overrides::new(
            self.namespace.clone(),
            self.name.clone(),
            Some(self.replicas),
        )
    }

    /// Where to save the result, if anywhere.
    fn target(&self) -> Option<PathBuf> {
        match (&self.output, self.save) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from(DEFAULT_OUTPUT)),
            (None, false) => None,
        }
    }
}

pub fn run(ctx: &Context, args: GenerateArgs) -> anyhow::Result<()> {
    let client = ctx.completer()?;
    let yaml = generate(ctx, &client, &args)?;
    let saved = save(&args, &yaml)?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "yaml": yaml,
            "saved_to": saved,
        }));
    }

    print_ruled("📄 Generated Kubernetes YAML:", &yaml);
    if let Some(path) = saved {
        println!("✅ YAML saved to file: {}", path.display());
    }
    Ok(())
}

/// Ask the model for manifests and strip everything that isn't YAML.
pub(crate) fn generate(
    ctx: &Context,
    completer: &dyn Completer,
    args: &GenerateArgs,
) -> anyhow::Result<String> {
    let description = join_words(&args.description).unwrap_or_default();
    ctx.record(
        "generate",
        &format!(
            "desc='{description}' ns={} replicas={} name={} save={} output={}",
            args.namespace.as_deref().unwrap_or(""),
            args.replicas,
            args.name.as_deref().unwrap_or(""),
            args.save,
            display_path(&args.output)
        ),
    );

    let pair = prompt::generate(&description, &args.overrides());
    let completion = ctx.ask(completer, pair)?;
    let yaml = clean_generated_yaml(&completion.text);
    if yaml.is_empty() {
        anyhow::bail!("the model returned no YAML");
    }
    Ok(yaml)
}

fn save(args: &GenerateArgs, yaml: &str) -> anyhow::Result<Option<PathBuf>> {
    let Some(path) = args.target() else {
        return Ok(None);
    };
    write_yaml(&path, yaml)?;
    Ok(Some(path))
}

fn write_yaml(path: &Path, yaml: &str) -> anyhow::Result<()> {
    let mut body = yaml.to_string();
    body.push('\n');
    kube_ai_core::io::atomic_write(path, body.as_bytes())
        .with_context(|| format!("failed to save YAML to {}", path.display()))
}
