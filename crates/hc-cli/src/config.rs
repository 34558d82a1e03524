//! Layered configuration: defaults, config file, environment, CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use hc_core::ModelSettings;
use hc_tools::{DEFAULT_DOMAINS_FILE, DEFAULT_NUM_RESULTS};

/// Environment variables read as-is, without the `HC_` prefix.
const RAW_ENV_KEYS: &[&str] = &[
    "OPENAI_MODEL",
    "TEMPERATURE",
    "MAX_TOKENS",
    "OPENAI_API_KEY",
    "SERPER_API_KEY",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat model name
    pub model: String,

    pub temperature: f32,

    /// Maximum output tokens per model call
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serper_api_key: Option<String>,

    /// Override for OpenAI-compatible endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serper_base_url: Option<String>,

    /// JSON file listing the allowed search domains (supports $VAR, ~)
    pub domains_file: String,

    /// Search results requested per query
    pub num_results: usize,

    /// Model calls allowed per pipeline stage
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            openai_api_key: None,
            serper_api_key: None,
            openai_base_url: None,
            serper_base_url: None,
            domains_file: DEFAULT_DOMAINS_FILE.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
            max_iterations: 15,
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains_file: Option<String>,
}

impl Config {
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        let path = Self::config_path()?;
        Self::figment(Some(&path), overrides)
            .extract()
            .with_context(|| format!("Invalid configuration (config file: {})", path.display()))
    }

    /// Build the provider stack, lowest precedence first.
    pub fn figment(file: Option<&Path>, overrides: &CliOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = file {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
            .merge(Env::raw().only(RAW_ENV_KEYS).map(|key| {
                if key.as_str().eq_ignore_ascii_case("openai_model") {
                    "model".into()
                } else {
                    key.as_str().to_ascii_lowercase().into()
                }
            }))
            .merge(Env::prefixed("HC_"))
            .merge(Serialized::defaults(overrides))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("hc"))
    }

    pub fn domains_path(&self) -> PathBuf {
        expand_path(&self.domains_file)
    }

    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            model: Some(self.model.clone()),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }

    /// Names of the required API key variables that are unset or blank.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.openai_api_key) {
            missing.push("OPENAI_API_KEY");
        }
        if is_blank(&self.serper_api_key) {
            missing.push("SERPER_API_KEY");
        }
        missing
    }

    /// A copy safe to print: API keys are masked.
    pub fn masked(&self) -> Self {
        Self {
            openai_api_key: self.openai_api_key.as_deref().map(mask_secret),
            serper_api_key: self.serper_api_key.as_deref().map(mask_secret),
            ..self.clone()
        }
    }

    pub fn to_display_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.masked()).context("Failed to render configuration")
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Expand environment variables in a path string
/// Supports: $VAR, ${VAR}, ~
pub fn expand_path(path: &str) -> PathBuf {
    let mut result = path.to_string();

    if result.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            result = format!("{}{}", home.display(), &result[1..]);
        }
    } else if result == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    let Ok(re) = regex::Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?") else {
        return PathBuf::from(result);
    };
    let expanded = re.replace_all(&result, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    PathBuf::from(expanded.to_string())
}
