use thiserror::Error;

use crate::services::openrouter_config::{API_KEY_PREFIX, KEYS_URL};

/// Errors raised while reading OpenRouter settings from the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// `OPENROUTER_API_KEY` is not set
    #[error(
        "OPENROUTER_API_KEY environment variable is required. \
         Please set it in your .env.local file or environment variables. \
         Get your API key from: {}",
        KEYS_URL
    )]
    MissingKey,
    /// `OPENROUTER_API_KEY` is set but does not look like an OpenRouter key
    #[error(
        "Invalid OPENROUTER_API_KEY format. \
         OpenRouter API keys should start with \"{}\". \
         Please check your API key from: {}",
        API_KEY_PREFIX,
        KEYS_URL
    )]
    InvalidKeyFormat,
}
