use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const ENV_PREFIX: &str = "USERFETCH";

/// Runtime settings. `USERFETCH_*` variables and `.env` are optional overrides;
/// with none set the fixed GitHub endpoint is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL the `/users/{user}` path is appended to
    pub api_base: String,
    /// GitHub rejects requests without a User-Agent
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Load from the process environment, after reading `.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(Environment::with_prefix(ENV_PREFIX))
    }

    #[cfg(test)]
    pub fn from_source(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::build(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

pub fn client_builder(settings: &Settings) -> reqwest::ClientBuilder {
    reqwest::Client::builder().user_agent(settings.user_agent.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_source(Map::new()).unwrap();
        assert_eq!(settings.api_base, "https://api.github.com");
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
        assert!(settings.user_agent.starts_with("github-user-fetch/"));
    }

    #[test]
    fn test_env_overrides() {
        let mut vars = Map::new();
        vars.insert(
            "USERFETCH_API_BASE".to_string(),
            "http://127.0.0.1:8080/".to_string(),
        );
        vars.insert("USERFETCH_USER_AGENT".to_string(), "tester/1.0".to_string());

        let settings = Settings::from_source(vars).unwrap();
        assert_eq!(settings.api_base, "http://127.0.0.1:8080/");
        assert_eq!(settings.user_agent, "tester/1.0");
        assert_eq!(
            crate::github::user_url(&settings.api_base, "benthecoder"),
            "http://127.0.0.1:8080/users/benthecoder"
        );
    }

    #[test]
    fn test_unrelated_vars_ignored() {
        let mut vars = Map::new();
        vars.insert("API_BASE".to_string(), "http://elsewhere".to_string());

        let settings = Settings::from_source(vars).unwrap();
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_client_builder() {
        assert!(client_builder(&Settings::default()).build().is_ok());
    }
}
