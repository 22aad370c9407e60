//! OpenRouter settings sourced from the process environment.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigurationError;

pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const OPENROUTER_MODEL_VAR: &str = "OPENROUTER_MODEL";

/// Every OpenRouter API key starts with this
pub const API_KEY_PREFIX: &str = "sk-or-v1-";

/// Model used when `OPENROUTER_MODEL` is not set
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Where users get an API key
pub const KEYS_URL: &str = "https://openrouter.ai/keys";

/// Env files loaded by [`load_env_files`], highest precedence first
const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// A source of environment variables
pub trait EnvSource {
    /// Value of `name`, or `None` when unset
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Validated OpenRouter settings
#[derive(Clone, PartialEq, Eq)]
pub struct OpenRouterEnv {
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for OpenRouterEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterEnv")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Validate the OpenRouter variables in the process environment.
pub fn validate_openrouter_env() -> Result<OpenRouterEnv, ConfigurationError> {
    validate_openrouter_env_from(&ProcessEnv)
}

/// Validate the OpenRouter variables found in `env`.
///
/// An empty key counts as missing and an empty model falls back to
/// [`DEFAULT_MODEL`]. Values are used as-is, without trimming.
pub fn validate_openrouter_env_from(
    env: &impl EnvSource,
) -> Result<OpenRouterEnv, ConfigurationError> {
    let api_key = env
        .var(OPENROUTER_API_KEY_VAR)
        .filter(|key| !key.is_empty())
        .ok_or(ConfigurationError::MissingKey)?;

    if !api_key.starts_with(API_KEY_PREFIX) {
        return Err(ConfigurationError::InvalidKeyFormat);
    }

    let configured = env.var(OPENROUTER_MODEL_VAR).filter(|model| !model.is_empty());
    let defaulted = configured.is_none();
    let model = configured.unwrap_or_else(|| DEFAULT_MODEL.to_string());
    debug!(
        target: "openrouter",
        model = %model,
        defaulted = defaulted,
        "OpenRouter environment validated"
    );

    Ok(OpenRouterEnv { api_key, model })
}

/// Model name configured in the process environment.
pub fn get_openrouter_model() -> Result<String, ConfigurationError> {
    get_openrouter_model_from(&ProcessEnv)
}

pub fn get_openrouter_model_from(env: &impl EnvSource) -> Result<String, ConfigurationError> {
    let OpenRouterEnv { model, .. } = validate_openrouter_env_from(env)?;
    Ok(model)
}

/// Load `.env.local` and `.env` from the current directory into the process
/// environment. Returns the files that were loaded.
pub fn load_env_files() -> Vec<PathBuf> {
    load_env_files_from(Path::new("."))
}

/// Load `.env.local` and `.env` from `dir`.
///
/// Variables that are already set are never overwritten, so `.env.local`
/// wins over `.env` and both lose to the real environment. A file that fails
/// to parse is skipped as a whole.
pub fn load_env_files_from(dir: &Path) -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    for name in ENV_FILES {
        let path = dir.join(name);
        match read_env_file(&path) {
            Ok(vars) => {
                for (key, value) in vars {
                    if std::env::var_os(&key).is_none() {
                        std::env::set_var(&key, value);
                    }
                }
                debug!(target: "openrouter", path = %path.display(), "Loaded env file");
                loaded.push(path);
            }
            Err(e) if e.not_found() => {}
            Err(e) => {
                warn!(
                    target: "openrouter",
                    path = %path.display(),
                    error = %e,
                    "Failed to load env file"
                );
            }
        }
    }
    loaded
}

/// Parse every line of an env file without touching the environment
fn read_env_file(path: &Path) -> dotenvy::Result<Vec<(String, String)>> {
    dotenvy::from_path_iter(path)?.collect()
}
