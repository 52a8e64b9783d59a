use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::NetworkId;

/// Environment variable holding the Token API bearer token
pub const CREDENTIAL_ENV: &str = "TOKEN_API_JWT";

pub const DEFAULT_BASE_URL: &str = "https://token-api.thegraph.com";
pub const DEFAULT_WALLET: &str = "0x2a0c0dbecc7e4d658f48e01e3fa353f44050c208";
pub const DEFAULT_TOKEN: &str = "0xc944e90c64b2c07662a292be6244bdf05cda44a7";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional settings file (`config.toml`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub base_url: Option<String>,
    pub network: Option<String>,
    pub page_size: Option<u32>,
    pub top_n: Option<usize>,
    /// Seconds; 0 disables the request timeout
    pub timeout_secs: Option<u64>,
    pub wallet: Option<String>,
    pub token: Option<String>,
}

impl Config {
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Configured network, falling back to mainnet when unset or unknown
    pub fn network(&self) -> NetworkId {
        self.network
            .as_deref()
            .and_then(|n| n.parse().ok())
            .unwrap_or_default()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
            .filter(|n| (1..=1000).contains(n))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn top_n(&self) -> usize {
        self.top_n
            .filter(|n| *n > 0)
            .unwrap_or(crate::domain::DEFAULT_TOP_N)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn wallet(&self) -> String {
        self.wallet.clone().unwrap_or_else(|| DEFAULT_WALLET.to_string())
    }

    pub fn token(&self) -> String {
        self.token.clone().unwrap_or_else(|| DEFAULT_TOKEN.to_string())
    }
}

/// Bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Read once from [`CREDENTIAL_ENV`]; empty counts as absent
    pub fn from_env() -> Option<Self> {
        std::env::var(CREDENTIAL_ENV).ok().and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First ten characters, for diagnostics
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(10).collect();
        format!("{head}...")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.preview())
    }
}

/// Immutable API settings, built once at startup and shared by the
/// endpoint builders and the executor
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub credential: Option<Credential>,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, credential: Option<Credential>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_config(config: &Config, credential: Option<Credential>) -> Self {
        Self::new(config.base_url(), credential).with_timeout(config.timeout())
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config file");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TOKENBOARD_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("tokenboard").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("tokenboard").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "tokenboard", "tokenboard")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return xdg.join("tokenboard");
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return home.join(".local").join("share").join("tokenboard");
    }
    directories::ProjectDirs::from("io", "tokenboard", "tokenboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".tokenboard"))
}

pub fn log_path() -> PathBuf {
    data_dir().join("tokenboard.log")
}

pub fn export_dir() -> PathBuf {
    data_dir().join("exports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_is_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.network(), NetworkId::Mainnet);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.top_n(), 5);
        assert_eq!(config.timeout(), Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
        assert_eq!(config.wallet(), DEFAULT_WALLET);
    }

    #[test]
    fn test_values_from_toml() {
        let config: Config = toml::from_str(
            r#"
            base_url = "http://localhost:8000/"
            network = "base"
            page_size = 50
            timeout_secs = 0
            token = "0xdead"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.network(), NetworkId::Base);
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.token(), "0xdead");
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let config: Config = toml::from_str("page_size = 5000\nnetwork = \"solana\"\ntop_n = 0").unwrap();
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.network(), NetworkId::Mainnet);
        assert_eq!(config.top_n(), 5);
    }

    #[test]
    fn test_api_config_from_file_with_cli_base_url() {
        let config: Config = toml::from_str("base_url = \"http://file\"\ntimeout_secs = 5").unwrap();
        let api = ApiConfig::from_config(&config, Credential::new("jwt"));
        assert_eq!(api.base_url, "http://file");
        assert_eq!(api.timeout, Some(Duration::from_secs(5)));

        let api = api.with_base_url("http://localhost:9000/");
        assert_eq!(api.base_url, "http://localhost:9000");
        assert_eq!(api.timeout, Some(Duration::from_secs(5)));
        assert!(api.credential.is_some());
    }

    #[test]
    fn test_credential_is_redacted() {
        assert!(Credential::new("   ").is_none());
        let credential = Credential::new("eyJhbGciOiJIUzI1NiJ9.secret-part").unwrap();
        let debug = format!("{credential:?}");
        assert_eq!(debug, "Credential(eyJhbGciOi...)");
        assert!(!debug.contains("secret-part"));
        assert_eq!(credential.expose(), "eyJhbGciOiJIUzI1NiJ9.secret-part");
    }
}
