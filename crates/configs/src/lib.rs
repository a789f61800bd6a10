use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), json_logs: false }
    }
}

/// Which Entity Access Client backs the controllers.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    /// In-process store, for local runs and demos.
    #[default]
    Memory,
    /// Remote entity platform over REST.
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub mode: PlatformMode,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self { mode: PlatformMode::Memory, base_url: String::new(), api_token: None, request_timeout_secs: default_request_timeout() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: default_cache_ttl() }
    }
}

fn default_request_timeout() -> u64 { 30 }
fn default_cache_ttl() -> u64 { 300 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file if present, otherwise defaults filled from the environment.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(_) => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
        if std::env::var("CYODA_BASE_URL").is_ok() {
            cfg.platform.mode = PlatformMode::Http;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.platform.normalize_from_env();
        self.platform.validate()?;
        self.dashboard.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl PlatformConfig {
    pub fn normalize_from_env(&mut self) {
        if self.base_url.trim().is_empty() {
            if let Ok(url) = std::env::var("CYODA_BASE_URL") {
                self.base_url = url;
            }
        }
        if self.api_token.is_none() {
            self.api_token = std::env::var("CYODA_API_TOKEN").ok();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mode != PlatformMode::Http {
            return Ok(());
        }
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("platform.base_url is empty; set it in config.toml or CYODA_BASE_URL"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("platform.base_url must start with http:// or https://"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("platform.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_secs == 0 {
            return Err(anyhow!("dashboard.cache_ttl_secs must be >= 1"));
        }
        Ok(())
    }
}
