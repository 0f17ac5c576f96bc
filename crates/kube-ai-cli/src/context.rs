use anyhow::Context as _;
use kube_ai_core::config::Settings;
use kube_ai_core::history::{self, History};
use kube_ai_core::kubectl::Kubectl;
use kube_ai_core::prompt::PromptPair;
use llm_client::{ClientConfig, Completer, Completion, CompletionClient, PromptRequest};

use crate::output::print_json;

/// Everything a command handler needs for one invocation.
pub struct Context {
    pub settings: Settings,
    pub json: bool,
    history: Option<History>,
}

impl Context {
    pub fn new(settings: Settings, json: bool) -> Self {
        let history = settings.history_path.clone().map(History::new);
        Self {
            settings,
            json,
            history,
        }
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Append to the history log; failures only produce a warning.
    pub fn record(&self, command: &str, detail: &str) {
        history::record_quietly(self.history(), command, detail);
    }

    /// Build the completion client. Fails early when no API key is configured.
    pub fn completer(&self) -> anyhow::Result<CompletionClient> {
        let api_key = self.settings.require_api_key()?;
        let config = ClientConfig::new(api_key, self.settings.base_url.clone());
        CompletionClient::new(config).context("failed to build HTTP client")
    }

    pub fn kubectl(&self) -> anyhow::Result<Kubectl> {
        Ok(Kubectl::locate(&self.settings)?)
    }

    /// Send `prompt` with the configured model and token budget.
    pub fn ask(&self, completer: &dyn Completer, prompt: PromptPair) -> anyhow::Result<Completion> {
        let request = PromptRequest::new(self.settings.model.clone(), prompt.user)
            .system(prompt.system)
            .max_tokens(self.settings.max_tokens);
        completer
            .complete(&request)
            .context("completion request failed")
    }

    /// Print a model answer under `heading`, or as JSON with `--json`.
    pub fn print_answer(
        &self,
        command: &str,
        heading: &str,
        completion: &Completion,
        answer: &str,
    ) -> anyhow::Result<()> {
        if self.json {
            return print_json(&serde_json::json!({
                "command": command,
                "model": completion.model,
                "answer": answer,
            }));
        }
        println!("\n{heading}");
        println!("{answer}");
        Ok(())
    }
}
