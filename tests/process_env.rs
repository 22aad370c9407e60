//! Exercises the real process environment.
//!
//! Everything lives in one test so that nothing else in this binary touches
//! the environment concurrently.

use std::fs;

use openrouter_env::{
    create_client, create_openrouter_client, get_openrouter_model, load_env_files,
    load_env_files_from, validate_openrouter_env, ClientFactory, ClientOptions,
    ConfigurationError, HttpClientFactory, OpenRouterClient, DEFAULT_MODEL,
    OPENROUTER_API_KEY_VAR, OPENROUTER_BASE_URL, OPENROUTER_MODEL_VAR,
};

struct PassThrough;

impl ClientFactory for PassThrough {
    type Client = ClientOptions;

    fn create(&self, options: ClientOptions) -> ClientOptions {
        options
    }
}

fn clear() {
    std::env::remove_var(OPENROUTER_API_KEY_VAR);
    std::env::remove_var(OPENROUTER_MODEL_VAR);
}

#[test]
fn test_process_environment() {
    clear();
    assert_eq!(validate_openrouter_env(), Err(ConfigurationError::MissingKey));
    assert_eq!(get_openrouter_model(), Err(ConfigurationError::MissingKey));
    assert!(create_openrouter_client(reqwest::Client::new()).is_err());

    std::env::set_var(OPENROUTER_API_KEY_VAR, "not-a-key");
    assert_eq!(create_client(&PassThrough), Err(ConfigurationError::InvalidKeyFormat));

    std::env::set_var(OPENROUTER_API_KEY_VAR, "sk-or-v1-abc123");
    let validated = validate_openrouter_env().unwrap();
    assert_eq!(validated.api_key, "sk-or-v1-abc123");
    assert_eq!(validated.model, DEFAULT_MODEL);

    std::env::set_var(OPENROUTER_MODEL_VAR, "meta/llama-3");
    assert_eq!(get_openrouter_model().unwrap(), "meta/llama-3");
    assert_eq!(
        create_client(&PassThrough).unwrap(),
        ClientOptions {
            api_key: "sk-or-v1-abc123".to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
        }
    );
    let client = create_openrouter_client(reqwest::Client::new()).unwrap();
    assert_eq!(client.base_url(), OPENROUTER_BASE_URL);

    let factory = HttpClientFactory::new().unwrap();
    let client: OpenRouterClient = create_client(&factory).unwrap();
    assert_eq!(
        client.endpoint("chat/completions"),
        "https://openrouter.ai/api/v1/chat/completions"
    );

    // A key that is not valid Unicode counts as missing
    #[cfg(unix)]
    {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var(OPENROUTER_API_KEY_VAR, OsStr::from_bytes(b"sk-or-v1-\xff"));
        assert_eq!(validate_openrouter_env(), Err(ConfigurationError::MissingKey));
    }

    // .env.local wins over .env, and neither overrides the real environment
    clear();
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".env.local"),
        "OPENROUTER_API_KEY=sk-or-v1-local\n",
    )
    .unwrap();
    fs::write(
        dir.path().join(".env"),
        "OPENROUTER_API_KEY=sk-or-v1-shared\nOPENROUTER_MODEL=meta/llama-3\n",
    )
    .unwrap();
    std::env::set_var(OPENROUTER_MODEL_VAR, "openai/gpt-4o");

    let loaded = load_env_files_from(dir.path());
    assert_eq!(
        loaded,
        vec![dir.path().join(".env.local"), dir.path().join(".env")]
    );
    let validated = validate_openrouter_env().unwrap();
    assert_eq!(validated.api_key, "sk-or-v1-local");
    assert_eq!(validated.model, "openai/gpt-4o");

    // Missing files are skipped
    let empty = tempfile::tempdir().unwrap();
    assert!(load_env_files_from(empty.path()).is_empty());

    // A malformed file is skipped whole, nothing before the bad line leaks
    clear();
    let broken = tempfile::tempdir().unwrap();
    fs::write(
        broken.path().join(".env.local"),
        "OPENROUTER_API_KEY=sk-or-v1-broken\nthis is not valid\nOPENROUTER_MODEL=meta/llama-3\n",
    )
    .unwrap();
    fs::write(
        broken.path().join(".env"),
        "OPENROUTER_API_KEY=sk-or-v1-fallback\n",
    )
    .unwrap();
    let loaded = load_env_files_from(broken.path());
    assert_eq!(loaded, vec![broken.path().join(".env")]);
    let validated = validate_openrouter_env().unwrap();
    assert_eq!(validated.api_key, "sk-or-v1-fallback");
    assert_eq!(validated.model, DEFAULT_MODEL);

    // Without a directory, files come from the current one
    clear();
    let cwd = tempfile::tempdir().unwrap();
    fs::write(cwd.path().join(".env"), "OPENROUTER_API_KEY=sk-or-v1-cwd\n").unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(cwd.path()).unwrap();
    let loaded = load_env_files();
    std::env::set_current_dir(previous).unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded[0].ends_with(".env"));
    assert_eq!(validate_openrouter_env().unwrap().api_key, "sk-or-v1-cwd");

    clear();
}
