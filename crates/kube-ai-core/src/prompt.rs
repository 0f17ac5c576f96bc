//! System prompts and user-prompt builders for each assistant command.

use regex::Regex;
use std::sync::OnceLock;

use crate::manifest::Overrides;

/// A system + user prompt pair ready to send to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

pub const ANALYZE_SYSTEM: &str = "You are a certified Kubernetes expert.
Your task is to analyze raw kubectl command outputs (describe, logs, events, etc.) or YAML manifests and help diagnose issues.
If a pod is crashing, stuck, or unhealthy, identify root causes such as image pull errors, readiness probe failures, or insufficient resources.
Give detailed reasoning, possible root causes, and potential fixes.";

pub fn analyze(data: &str, question: &str) -> PromptPair {
    PromptPair {
        system: ANALYZE_SYSTEM.to_string(),
        user: format!(
            "Analyze the following Kubernetes data and answer the user's question.

--- Start of Kubernetes Output ---
{data}
--- End of Kubernetes Output ---

User question: {question}"
        ),
    }
}

// ---------------------------------------------------------------------------
// audit
// ---------------------------------------------------------------------------

pub const AUDIT_SYSTEM: &str = "You are a Kubernetes security auditor.
Your job is to detect any security vulnerabilities, misconfigurations, and best practice violations in Kubernetes manifests or outputs.
Focus on issues like missing resource limits, excessive permissions, absent network policies, and insecure container settings.";

pub const AUDIT_DEFAULT_TASK: &str =
    "Please audit the following Kubernetes manifest or output for security risks and best practice violations.";

pub fn audit(data: &str, question: Option<&str>) -> PromptPair {
    let task = question.unwrap_or(AUDIT_DEFAULT_TASK);
    PromptPair {
        system: AUDIT_SYSTEM.to_string(),
        user: format!("Kubernetes Resource to Audit:\n---\n{data}\n---\nTask: {task}\n"),
    }
}

// ---------------------------------------------------------------------------
// diagnose
// ---------------------------------------------------------------------------

pub const DIAGNOSE_SYSTEM: &str = "You are a Kubernetes troubleshooter.
Analyze pod outputs such as describe results, logs, and events.
Identify problems like CrashLoopBackOff, OOMKilled, ImagePullBackOff, readiness probe failures, node pressure, etc.
Provide a clear diagnosis and suggest potential fixes.";

pub const DIAGNOSE_DEFAULT_TASK: &str =
    "Please diagnose the issue in the following Kubernetes pod output.";

pub fn diagnose(data: &str, question: Option<&str>) -> PromptPair {
    let task = question.unwrap_or(DIAGNOSE_DEFAULT_TASK);
    PromptPair {
        system: DIAGNOSE_SYSTEM.to_string(),
        user: format!("Pod Output:\n---\n{data}\n---\nTask: {task}\n"),
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

pub const GENERATE_SYSTEM: &str = "You are a Kubernetes YAML generator.
Return only raw YAML manifests without any markdown, code blocks, or titles.
Do not include any text like 'Deployment manifest', 'Service manifest', or 'yaml'. Only valid YAML content.";

const GENERATE_SUFFIX: &str =
    " ONLY return raw Kubernetes YAML. Do not include any titles, explanations, or code blocks.";

pub fn generate(description: &str, overrides: &Overrides) -> PromptPair {
    let mut user = description.to_string();
    if let Some(ns) = overrides.namespace() {
        user.push_str(&format!(" Use namespace '{ns}'."));
    }
    if let Some(replicas) = overrides.replicas() {
        user.push_str(&format!(" Set replicas to {replicas}."));
    }
    if let Some(name) = overrides.name() {
        user.push_str(&format!(" Set metadata name to '{name}'."));
    }
    user.push_str(GENERATE_SUFFIX);

    PromptPair {
        system: GENERATE_SYSTEM.to_string(),
        user,
    }
}

// ---------------------------------------------------------------------------
// chat
// ---------------------------------------------------------------------------

pub const CHAT_SYSTEM: &str = "You are a Kubernetes expert and CLI assistant.
Always answer user questions with short and clear Kubernetes CLI examples, YAML snippets, or precise step-by-step instructions.
Focus on practical guidance only. Example:
- \"kubectl apply -f filename.yaml\"
- \"kubectl get pods --namespace=my-namespace\"";

pub fn chat(question: &str, yaml_context: Option<&str>) -> PromptPair {
    let mut system = CHAT_SYSTEM.to_string();
    if let Some(yaml) = yaml_context.filter(|y| !y.is_empty()) {
        system.push_str(&format!(
            "\n\nThe user also has the following YAML file open:\n\n--- YAML START ---\n{yaml}\n--- YAML END ---"
        ));
    }
    PromptPair {
        system,
        user: question.to_string(),
    }
}

static YAML_REF_RE: OnceLock<Regex> = OnceLock::new();

fn yaml_ref_re() -> &'static Regex {
    YAML_REF_RE.get_or_init(|| Regex::new(r"[\w\-.]+\.ya?ml\b").expect("static regex"))
}

/// The first `something.yaml` / `something.yml` token mentioned in `text`.
pub fn detect_yaml_reference(text: &str) -> Option<&str> {
    yaml_ref_re().find(text).map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// suggest
// ---------------------------------------------------------------------------

pub const SUGGEST_SYSTEM: &str = "You are a Kubernetes expert assistant. Only return valid shell commands using kubectl. Avoid explanations unless requested.";

pub fn suggest_for_manifest(manifest: &str) -> PromptPair {
    PromptPair {
        system: SUGGEST_SYSTEM.to_string(),
        user: format!(
            "This is a Kubernetes manifest:

---
{manifest}
---

What would be the correct kubectl command to apply or interact with this manifest? Respond with only the shell command."
        ),
    }
}

pub fn suggest_for_question(question: &str) -> PromptPair {
    PromptPair {
        system: SUGGEST_SYSTEM.to_string(),
        user: format!(
            "I want to troubleshoot or manage my Kubernetes resources.

Question:
{question}

Please suggest valid kubectl command(s). Respond only with shell commands."
        ),
    }
}
