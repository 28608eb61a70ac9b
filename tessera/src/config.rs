use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Human-readable service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Tessera OCR API";

/// File name of the engine configuration looked up under the install root.
pub const DEFAULT_ENGINE_CONFIG_FILE: &str = "default_ocr.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9003;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read `TESSERA_LOG_FORMAT` (unset means text).
    ///
    /// Runs before the subscriber exists, so an invalid value is returned
    /// for the caller to report once logging is up.
    pub fn from_env() -> Result<Self, String> {
        match env::var("TESSERA_LOG_FORMAT") {
            Ok(val) => val.parse(),
            Err(_) => Ok(LogFormat::Text),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Directory the engine configuration and relative data paths resolve against.
    pub home: Option<PathBuf>,
    /// Explicit engine configuration file; must exist when set.
    pub engine_config: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Install root: `home` if configured, else derived from the executable.
    pub fn install_root(&self) -> PathBuf {
        if let Some(home) = &self.home {
            return home.clone();
        }

        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
            .map(|exe_dir| install_root_from_exe_dir(&exe_dir))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The well-known engine configuration path under the install root.
    pub fn default_engine_config_path(&self) -> PathBuf {
        self.install_root().join(DEFAULT_ENGINE_CONFIG_FILE)
    }
}

/// Binaries normally live in `<root>/bin`; otherwise the executable's
/// directory is the root.
fn install_root_from_exe_dir(exe_dir: &std::path::Path) -> PathBuf {
    match exe_dir.file_name().and_then(|n| n.to_str()) {
        Some("bin") => exe_dir
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| exe_dir.to_path_buf()),
        _ => exe_dir.to_path_buf(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("TESSERA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: parse_env_or("TESSERA_PORT", DEFAULT_PORT),
                max_upload_bytes: parse_env_or("TESSERA_MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                home: env_path("TESSERA_HOME"),
                engine_config: env_path("TESSERA_ENGINE_CONFIG"),
                timeout_secs: parse_env_or("TESSERA_OCR_TIMEOUT_SECS", 60),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
