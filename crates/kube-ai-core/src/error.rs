use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KubeAiError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file '{0}' does not exist")]
    FileNotFound(PathBuf),

    #[error("failed to parse YAML document {index}: {source}")]
    ManifestParse {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no YAML documents found in '{0}'")]
    EmptyManifest(PathBuf),

    #[error("YAML document {index} is not a mapping")]
    NotAMapping { index: usize },

    #[error("failed to serialize YAML document {index}: {source}")]
    ManifestSerialize {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to load {path}: {source}")]
    DotEnv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("kubectl not found on PATH (set KUBECTL to override)")]
    KubectlNotFound,

    #[error("kubectl {args} failed ({status})\n{output}")]
    KubectlFailed {
        args: String,
        status: String,
        output: String,
    },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KubeAiError>;
