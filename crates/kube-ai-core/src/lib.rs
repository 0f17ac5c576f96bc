pub mod clean;
pub mod config;
pub mod error;
pub mod history;
pub mod io;
pub mod kubectl;
pub mod manifest;
pub mod prompt;

pub use error::{KubeAiError, Result};
