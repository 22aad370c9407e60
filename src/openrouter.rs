//! OpenRouter client construction.
//!
//! OpenRouter provides a unified, OpenAI-compatible API to access various LLMs
//! including Claude, GPT-4, Llama, etc. This module only builds a configured
//! handle; sending requests is left to the caller.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use tracing::debug;

use crate::error::ConfigurationError;
use crate::services::openrouter_config::{validate_openrouter_env_from, EnvSource, ProcessEnv};

/// Base URL of the OpenRouter API
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Parameters handed to a [`ClientFactory`]
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builds a client handle from validated options
pub trait ClientFactory {
    type Client;

    fn create(&self, options: ClientOptions) -> Self::Client;
}

/// Validate the process environment and build a client with `factory`.
pub fn create_client<F: ClientFactory>(factory: &F) -> Result<F::Client, ConfigurationError> {
    create_client_from(&ProcessEnv, factory)
}

/// Validate `env` and build a client with `factory`.
///
/// The factory is not called when validation fails.
pub fn create_client_from<F: ClientFactory>(
    env: &impl EnvSource,
    factory: &F,
) -> Result<F::Client, ConfigurationError> {
    let validated = validate_openrouter_env_from(env)?;
    debug!(target: "openrouter", base_url = OPENROUTER_BASE_URL, "Creating OpenRouter client");
    Ok(factory.create(ClientOptions {
        api_key: validated.api_key,
        base_url: OPENROUTER_BASE_URL.to_string(),
    }))
}

/// Build an [`OpenRouterClient`] from the process environment, sharing `http_client`.
pub fn create_openrouter_client(
    http_client: reqwest::Client,
) -> Result<OpenRouterClient, ConfigurationError> {
    create_client(&HttpClientFactory::with_http_client(http_client))
}

/// Factory producing [`OpenRouterClient`]s over one shared HTTP client
#[derive(Clone, Debug)]
pub struct HttpClientFactory {
    http_client: reqwest::Client,
}

impl HttpClientFactory {
    /// Create a factory with a new HTTP client
    pub fn new() -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http_client })
    }

    /// Create a factory with a shared HTTP client
    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = OpenRouterClient;

    fn create(&self, options: ClientOptions) -> OpenRouterClient {
        OpenRouterClient {
            api_key: options.api_key,
            base_url: options.base_url,
            http_client: self.http_client.clone(),
            attribution: None,
        }
    }
}

#[derive(Clone, Debug)]
struct Attribution {
    referer: String,
    title: String,
}

/// OpenRouter API client handle
#[derive(Clone)]
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
    attribution: Option<Attribution>,
}

impl fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("attribution", &self.attribution)
            .finish()
    }
}

impl OpenRouterClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Send `HTTP-Referer` and `X-Title` with every request, which OpenRouter
    /// uses to attribute traffic to an app.
    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.attribution = Some(Attribution {
            referer: referer.into(),
            title: title.into(),
        });
        self
    }

    /// Full URL for an API path such as `chat/completions`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Authorized request builder for an API path
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, self.endpoint(path))
            .bearer_auth(&self.api_key);
        if let Some(attribution) = &self.attribution {
            builder = builder
                .header("HTTP-Referer", attribution.referer.as_str())
                .header("X-Title", attribution.title.as_str());
        }
        builder
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }
}
