use crate::error::{KubeAiError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Environment keys and defaults
// ---------------------------------------------------------------------------

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "KUBE_AI_MODEL";
pub const ENV_MAX_TOKENS: &str = "KUBE_AI_MAX_TOKENS";
pub const ENV_HISTORY: &str = "KUBE_AI_HISTORY";
pub const ENV_KUBECTL: &str = "KUBECTL";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const HISTORY_FILE: &str = ".kube-ai-history";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Per-invocation settings, built once and handed to every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// `None` means "no home directory"; history is then disabled.
    pub history_path: Option<PathBuf>,
    /// Explicit kubectl binary; `None` resolves `kubectl` on `PATH`.
    pub kubectl: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            history_path: default_history_path(),
            kubectl: None,
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        settings.api_key = get(ENV_API_KEY);
        if let Some(url) = get(ENV_BASE_URL) {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get(ENV_MODEL) {
            settings.model = model;
        }
        if let Some(raw) = get(ENV_MAX_TOKENS) {
            settings.max_tokens = parse_max_tokens(&raw)?;
        }
        if let Some(path) = get(ENV_HISTORY) {
            settings.history_path = Some(PathBuf::from(path));
        }
        settings.kubectl = get(ENV_KUBECTL).map(PathBuf::from);

        Ok(settings)
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(KubeAiError::MissingApiKey)
    }
}

fn parse_max_tokens(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| KubeAiError::InvalidSetting {
            key: ENV_MAX_TOKENS,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn default_history_path() -> Option<PathBuf> {
    home::home_dir().map(|h| h.join(HISTORY_FILE))
}

// ---------------------------------------------------------------------------
// .env loading
// ---------------------------------------------------------------------------

/// Load `path` into the process environment without overriding variables
/// that are already set. Returns `false` when the file does not exist.
///
/// Must run before any other thread is started.
pub fn load_dotenv(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(source) => Err(KubeAiError::DotEnv {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.api_key, None);
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.model, DEFAULT_MODEL);
        assert_eq!(s.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(s.kubectl.is_none());
        assert!(matches!(s.require_api_key(), Err(KubeAiError::MissingApiKey)));
    }

    #[test]
    fn environment_overrides_defaults() {
        let s = Settings::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_BASE_URL, "http://127.0.0.1:9999/v1/"),
            (ENV_MODEL, "gpt-4o-mini"),
            (ENV_MAX_TOKENS, "256"),
            (ENV_HISTORY, "/tmp/hist"),
            (ENV_KUBECTL, "/opt/bin/kubectl"),
        ]))
        .unwrap();
        assert_eq!(s.require_api_key().unwrap(), "sk-test");
        assert_eq!(s.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(s.model, "gpt-4o-mini");
        assert_eq!(s.max_tokens, 256);
        assert_eq!(s.history_path, Some(PathBuf::from("/tmp/hist")));
        assert_eq!(s.kubectl, Some(PathBuf::from("/opt/bin/kubectl")));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let s = Settings::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap();
        assert!(s.api_key.is_none());
    }

    #[test]
    fn invalid_max_tokens_is_an_error() {
        let err = Settings::from_lookup(lookup(&[(ENV_MAX_TOKENS, "lots")])).unwrap_err();
        assert!(matches!(
            err,
            KubeAiError::InvalidSetting {
                key: ENV_MAX_TOKENS,
                ..
            }
        ));
    }

    #[test]
    fn dotenv_missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!load_dotenv(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn dotenv_strips_quotes_before_inline_comment() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# local settings\n\
             KUBE_AI_TEST_QUOTED=\"sk-quoted\" # note\n\
             export KUBE_AI_TEST_SINGLE='gpt-4o'\n",
        )
        .unwrap();

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(std::env::var("KUBE_AI_TEST_QUOTED").unwrap(), "sk-quoted");
        assert_eq!(std::env::var("KUBE_AI_TEST_SINGLE").unwrap(), "gpt-4o");
    }

    #[test]
    fn dotenv_does_not_override_existing_vars() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::env::set_var("KUBE_AI_TEST_EXISTING", "from-process");
        std::fs::write(
            &path,
            "KUBE_AI_TEST_EXISTING=from-file\nKUBE_AI_TEST_FRESH=fresh\n",
        )
        .unwrap();

        load_dotenv(&path).unwrap();
        assert_eq!(std::env::var("KUBE_AI_TEST_EXISTING").unwrap(), "from-process");
        assert_eq!(std::env::var("KUBE_AI_TEST_FRESH").unwrap(), "fresh");
    }

    #[test]
    fn dotenv_malformed_line_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "KUBE_AI_TEST_BROKEN is not a pair\n").unwrap();
        assert!(matches!(load_dotenv(&path), Err(KubeAiError::DotEnv { .. })));
    }
}
