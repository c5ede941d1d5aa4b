use std::time::Duration;

use serde::Deserialize;
use zb_srs::MasteryPolicy;

use crate::analysis::llm::LlmConfig;

/// Deployment environment, read from `ENV`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default)]
    pub mastery_policy: MasteryPolicy,
    /// Without a key the weakness analyzer always uses canned text
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_llm_api_endpoint")]
    pub llm_api_endpoint: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> String {
    "http://localhost:3000,http://localhost:8080".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_api_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Read the configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self
                .llm_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            model: self.llm_model.clone(),
            api_endpoint: self.llm_api_endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}
