pub mod openrouter_config;
