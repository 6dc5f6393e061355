use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default)]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: false,
        }
    }
}

/// Logging profile; `env` is one of `local`, `dev` or `prod`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_env")]
    pub env: String,
}

impl Default for LogConfig {
    fn default() -> Self { Self { env: default_log_env() } }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_request_timeout() -> u64 { 10 }
fn default_shutdown_timeout() -> u64 { 10 }
fn default_log_env() -> String { "dev".into() }

/// Resolve the config path: an explicit `--config` value wins over `CONFIG_PATH`, then `config.toml`.
pub fn config_path(explicit: Option<&str>) -> String {
    match explicit {
        Some(p) => p.to_string(),
        None => std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string()),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config file {path}: {e}"))?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from the resolved path and validate. A missing file means defaults
    /// plus environment fallbacks; an unreadable or malformed one is an error.
    pub fn load_or_default(explicit: Option<&str>) -> Result<Self> {
        let path = config_path(explicit);
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply defaults and env fallbacks, then report every violated rule at once.
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize();
        self.database.normalize_from_env();
        self.log.normalize();

        let mut problems = self.server.problems();
        problems.extend(self.database.problems());
        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("invalid configuration: {}", problems.join("; ")))
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.port == 0 {
            out.push("server.port must be within 1..=65535".to_string());
        }
        if self.request_timeout_secs == 0 {
            out.push("server.request_timeout_secs must be positive".to_string());
        }
        out
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // fall back to DATABASE_URL when the file leaves it out
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("invalid database configuration: {}", problems.join("; ")))
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.url.trim().is_empty() {
            out.push("database.url is empty; set it in config.toml or DATABASE_URL".to_string());
        } else {
            let lower = self.url.to_lowercase();
            if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
                out.push("database.url must start with postgresql:// or postgres://".to_string());
            }
        }
        if self.min_connections == 0 {
            out.push("database.min_connections must be >= 1".to_string());
        }
        if self.max_connections < self.min_connections {
            out.push("database.max_connections must be >= min_connections".to_string());
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            out.push("database timeouts must be positive seconds".to_string());
        }
        out
    }
}

impl LogConfig {
    fn normalize(&mut self) {
        self.env = self.env.trim().to_ascii_lowercase();
        if self.env.is_empty() {
            self.env = default_log_env();
        }
    }
}
