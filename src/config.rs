use crate::api::{Credentials, Endpoints, Token, DEFAULT_AUTH_URL, DEFAULT_BASE_URL};
use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// How the client gets its token.
#[derive(Debug, Clone)]
pub enum AuthSource {
    Credentials(Credentials),
    Token(Token),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthSource,
    pub endpoints: Endpoints,
    pub log_filter: String,
    pub log_file: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let auth = match (get("MYSTAT_LOGIN"), get("MYSTAT_PASSWORD"), get("MYSTAT_TOKEN")) {
            (Some(login), Some(password), _) => {
                AuthSource::Credentials(Credentials::new(login, password))
            }
            (_, _, Some(token)) => AuthSource::Token(Token::new(token.trim())),
            (Some(_), None, None) => {
                anyhow::bail!("MYSTAT_PASSWORD not found. Please set it in .env file or environment")
            }
            (None, Some(_), None) => {
                anyhow::bail!("MYSTAT_LOGIN not found. Please set it in .env file or environment")
            }
            (None, None, None) => anyhow::bail!(
                "No MyStat credentials found. Set MYSTAT_LOGIN and MYSTAT_PASSWORD (or MYSTAT_TOKEN) in .env file or environment"
            ),
        };

        let endpoints = Endpoints::new(
            get("MYSTAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            get("MYSTAT_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
        );

        Ok(Config {
            auth,
            endpoints,
            log_filter: get("MYSTAT_LOG").unwrap_or_else(|| "info".to_string()),
            log_file: get("MYSTAT_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("mystat.log")),
        })
    }

    pub fn override_endpoints(&mut self, base_url: Option<String>, auth_url: Option<String>) {
        if let Some(base_url) = base_url {
            self.endpoints = Endpoints::new(base_url, self.endpoints.auth_url.clone());
        }
        if let Some(auth_url) = auth_url {
            self.endpoints.auth_url = auth_url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("MYSTAT_LOGIN"));

        let err = config_from(&[("MYSTAT_LOGIN", "student")]).unwrap_err();
        assert!(err.to_string().contains("MYSTAT_PASSWORD"));

        let err = config_from(&[("MYSTAT_LOGIN", "student"), ("MYSTAT_PASSWORD", "  ")]).unwrap_err();
        assert!(err.to_string().contains("MYSTAT_PASSWORD"));
    }

    #[test]
    fn test_credentials_with_defaults() {
        let config =
            config_from(&[("MYSTAT_LOGIN", "student"), ("MYSTAT_PASSWORD", "secret")]).unwrap();

        match &config.auth {
            AuthSource::Credentials(c) => {
                assert_eq!(c.login, "student");
                assert_eq!(c.password, "secret");
            }
            other => panic!("unexpected auth source: {:?}", other),
        }
        assert_eq!(config.endpoints, Endpoints::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.log_file, PathBuf::from("mystat.log"));
    }

    #[test]
    fn test_token_only() {
        let config = config_from(&[("MYSTAT_TOKEN", "abc\n")]).unwrap();
        match config.auth {
            AuthSource::Token(token) => assert_eq!(token.as_str(), "abc"),
            other => panic!("unexpected auth source: {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_overrides() {
        let mut config = config_from(&[
            ("MYSTAT_TOKEN", "abc"),
            ("MYSTAT_BASE_URL", "http://env.local/v1/"),
        ])
        .unwrap();
        assert_eq!(config.endpoints.base_url, "http://env.local/v1");
        assert_eq!(config.endpoints.auth_url, DEFAULT_AUTH_URL);

        config.override_endpoints(None, Some("http://cli.local/login".to_string()));
        assert_eq!(config.endpoints.base_url, "http://env.local/v1");
        assert_eq!(config.endpoints.auth_url, "http://cli.local/login");

        config.override_endpoints(Some("http://cli.local".to_string()), None);
        assert_eq!(config.endpoints.base_url, "http://cli.local");
    }
}
