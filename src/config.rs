//! Server configuration. Each setting resolves flag > environment > default.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::llm::{ProviderConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::planner::{GenerationSettings, DEFAULT_MAX_TOKENS};

#[derive(Debug, Clone, Parser)]
#[command(name = "fitplan", about = "Fitness plan generation service")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "FITPLAN_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible provider
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Chat model used for plan generation
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Output token budget per completion
    #[arg(long, env = "FITPLAN_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Provider request timeout in seconds
    #[arg(long, env = "FITPLAN_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Return an error instead of plans that do not match the plan schema
    #[arg(long, env = "FITPLAN_STRICT_SCHEMA")]
    pub strict_schema: bool,
}

impl ServerArgs {
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(self.api_key.clone())
            .base_url(self.base_url.clone())
            .model(self.model.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            strict_schema: self.strict_schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn declared_defaults() {
        // Read from the command definition so FITPLAN_* variables in the
        // test environment cannot leak in.
        let command = ServerArgs::command();
        let default_of = |id: &str| -> Vec<String> {
            command
                .get_arguments()
                .find(|a| a.get_id() == id)
                .unwrap_or_else(|| panic!("no argument {id}"))
                .get_default_values()
                .iter()
                .map(|v| v.to_string_lossy().into_owned())
                .collect()
        };

        assert_eq!(default_of("max_tokens"), vec!["800"]);
        assert_eq!(default_of("timeout_secs"), vec!["60"]);
        assert_eq!(default_of("bind"), vec!["0.0.0.0:3000"]);
        assert_eq!(default_of("model"), vec![DEFAULT_MODEL]);
        assert_eq!(default_of("base_url"), vec![DEFAULT_BASE_URL]);
    }

    #[test]
    fn provider_config_carries_key_and_timeout() {
        let args = ServerArgs::try_parse_from(["fitplan", "--api-key", "sk-test"]).unwrap();
        let provider = args.provider_config();
        assert_eq!(provider.api_key, "sk-test");
        assert_eq!(provider.timeout, Duration::from_secs(args.timeout_secs));
    }

    #[test]
    fn flags_override_defaults() {
        let args = ServerArgs::try_parse_from([
            "fitplan",
            "--api-key",
            "k",
            "--bind",
            "127.0.0.1:9000",
            "--base-url",
            "http://localhost:8081",
            "--model",
            "llama3",
            "--max-tokens",
            "1200",
            "--timeout-secs",
            "5",
            "--strict-schema",
        ])
        .unwrap();

        assert_eq!(args.bind, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        let provider = args.provider_config();
        assert_eq!(provider.chat_completions_url(), "http://localhost:8081/v1/chat/completions");
        assert_eq!(provider.model, "llama3");
        assert_eq!(provider.timeout, Duration::from_secs(5));

        let settings = args.generation_settings();
        assert_eq!(settings.max_tokens, 1200);
        assert!(settings.strict_schema);
    }
}
