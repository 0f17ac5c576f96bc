pub mod analyze;
pub mod audit;
pub mod chat;
pub mod completion;
pub mod diagnose;
pub mod execute;
pub mod generate;
pub mod history;
pub mod modify;
pub mod suggest;
pub mod version;

use anyhow::Context as _;
use clap::Args;
use std::path::PathBuf;

use crate::context::Context;

// ---------------------------------------------------------------------------
// Shared input source: a file, or a live resource fetched through kubectl
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to a file containing a manifest or kubectl output
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Kubernetes resource type/name (e.g. deployment/nginx)
    #[arg(long)]
    pub name: Option<String>,

    /// Namespace of the resource
    #[arg(long)]
    pub ns: Option<String>,
}

/// How a live resource is read from the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// `kubectl get -o yaml`
    Get,
    /// `kubectl describe`
    Describe,
}

impl SourceArgs {
    /// The file contents if `--file` was given, otherwise the kubectl output
    /// if both `--name` and `--ns` were given, otherwise `None`.
    pub fn load(&self, ctx: &Context, fetch: Fetch) -> anyhow::Result<Option<String>> {
        if let Some(path) = &self.file {
            let text = kube_ai_core::io::read_text(path)
                .with_context(|| format!("failed to read file {}", path.display()))?;
            return Ok(Some(text));
        }

        let (Some(name), Some(ns)) = (non_empty(&self.name), non_empty(&self.ns)) else {
            return Ok(None);
        };

        let kubectl = ctx.kubectl()?;
        let output = match fetch {
            Fetch::Get => kubectl.get_yaml(name, ns),
            Fetch::Describe => kubectl.describe(name, ns),
        }
        .with_context(|| format!("failed to fetch {name} in namespace {ns} from the cluster"))?;
        Ok(Some(output))
    }

    pub fn describe(&self) -> String {
        format!(
            "file={} name={} ns={}",
            display_path(&self.file),
            self.name.as_deref().unwrap_or(""),
            self.ns.as_deref().unwrap_or("")
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub(crate) fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

/// Join positional words into one question; `None` when there are none.
pub(crate) fn join_words(words: &[String]) -> Option<String> {
    let joined = words.join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context_in;
    use tempfile::TempDir;

    #[test]
    fn file_wins_over_resource() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pod.txt");
        std::fs::write(&path, "Status: CrashLoopBackOff").unwrap();
        let src = SourceArgs {
            file: Some(path),
            name: Some("pod/x".into()),
            ns: Some("default".into()),
        };
        let ctx = context_in(dir.path());
        let data = src.load(&ctx, Fetch::Describe).unwrap();
        assert_eq!(data.as_deref(), Some("Status: CrashLoopBackOff"));
    }

    #[test]
    fn name_without_namespace_is_no_source() {
        let dir = TempDir::new().unwrap();
        let src = SourceArgs {
            name: Some("pod/x".into()),
            ..SourceArgs::default()
        };
        let ctx = context_in(dir.path());
        assert_eq!(src.load(&ctx, Fetch::Get).unwrap(), None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let src = SourceArgs {
            file: Some(dir.path().join("absent.yaml")),
            ..SourceArgs::default()
        };
        let ctx = context_in(dir.path());
        let err = src.load(&ctx, Fetch::Get).unwrap_err();
        assert!(format!("{err:#}").contains("does not exist"));
    }

    #[test]
    fn join_words_trims_and_rejects_empty() {
        assert_eq!(join_words(&[]), None);
        assert_eq!(join_words(&["  ".into()]), None);
        assert_eq!(
            join_words(&["why".into(), "pending?".into()]).as_deref(),
            Some("why pending?")
        );
    }
}
