//! Environment-driven configuration for OpenRouter clients.
//!
//! Reads `OPENROUTER_API_KEY` and `OPENROUTER_MODEL`, validates them and hands
//! the key to a [`ClientFactory`] along with the OpenRouter base URL.

mod error;
mod openrouter;
mod services;

pub use error::ConfigurationError;
pub use openrouter::{
    create_client, create_client_from, create_openrouter_client, ClientFactory, ClientOptions,
    HttpClientFactory, OpenRouterClient, OPENROUTER_BASE_URL,
};
pub use services::openrouter_config::{
    get_openrouter_model, get_openrouter_model_from, load_env_files, load_env_files_from,
    validate_openrouter_env, validate_openrouter_env_from, EnvSource, OpenRouterEnv, ProcessEnv,
    API_KEY_PREFIX, DEFAULT_MODEL, KEYS_URL, OPENROUTER_API_KEY_VAR, OPENROUTER_MODEL_VAR,
};
