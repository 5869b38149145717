use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
struct FileConfig {
    bind_addr: Option<String>,
    backend_url: Option<String>,
    frontend_dist: Option<String>,
    request_timeout_seconds: Option<u64>,
    max_upload_mb: Option<usize>,
    app_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RootConfig {
    #[serde(default, flatten)]
    top: FileConfig,
    docchat: Option<FileConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub backend_url: String,
    pub frontend_dist: String,
    pub request_timeout_seconds: u64,
    pub max_upload_mb: usize,
    pub app_title: String,
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            backend_url: "http://127.0.0.1:5000".to_string(),
            frontend_dist: "frontend/dist".to_string(),
            request_timeout_seconds: 120,
            max_upload_mb: 32,
            app_title: "DocChat".to_string(),
            config_path: PathBuf::from("docchat.toml"),
        }
    }
}

impl AppConfig {
    /// Defaults, then the first config file found, then `DOCCHAT_*` variables.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();

        let config_path = find_config_file().unwrap_or_else(|| config_search_paths()[0].clone());
        let root = load_root_config(&config_path)?;
        cfg.config_path = config_path;
        cfg.apply_root(root);
        cfg.apply_env();

        Ok(cfg)
    }

    fn apply_root(&mut self, root: RootConfig) {
        let RootConfig { top, docchat } = root;
        self.apply_file(top);
        if let Some(section) = docchat {
            self.apply_file(section);
        }
    }

    fn apply_file(&mut self, file_cfg: FileConfig) {
        set_opt(&mut self.bind_addr, file_cfg.bind_addr);
        set_opt(&mut self.backend_url, file_cfg.backend_url);
        set_opt(&mut self.frontend_dist, file_cfg.frontend_dist);
        set_opt_u64_min(
            &mut self.request_timeout_seconds,
            file_cfg.request_timeout_seconds,
            5,
        );
        set_opt_usize_min(&mut self.max_upload_mb, file_cfg.max_upload_mb, 1);
        set_opt(&mut self.app_title, file_cfg.app_title);
    }

    fn apply_env(&mut self) {
        let env_cfg = FileConfig {
            bind_addr: env_string("DOCCHAT_BIND_ADDR"),
            backend_url: env_string("DOCCHAT_BACKEND_URL"),
            frontend_dist: env_string("DOCCHAT_FRONTEND_DIST"),
            request_timeout_seconds: env_parse("DOCCHAT_REQUEST_TIMEOUT_SECONDS"),
            max_upload_mb: env_parse("DOCCHAT_MAX_UPLOAD_MB"),
            app_title: env_string("DOCCHAT_APP_TITLE"),
        };
        self.apply_file(env_cfg);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn frontend_dist(&self) -> PathBuf {
        PathBuf::from(&self.frontend_dist)
    }
}

pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("docchat.toml"), PathBuf::from("config.toml")];
    if let Some(home) = dirs_home() {
        paths.push(home.join(".config").join("docchat").join("config.toml"));
    }
    paths
}

pub fn find_config_file() -> Option<PathBuf> {
    config_search_paths().into_iter().find(|path| path.exists())
}

fn dirs_home() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

fn load_root_config(path: &Path) -> Result<RootConfig> {
    if !path.exists() {
        return Ok(RootConfig::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("failed reading {path:?}"))?;
    parse_root_config(&raw).with_context(|| format!("failed parsing {path:?}"))
}

fn parse_root_config(raw: &str) -> Result<RootConfig> {
    toml::from_str::<RootConfig>(raw).context("failed parsing config as root structure")
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn set_opt<T>(dst: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *dst = v;
    }
}

fn set_opt_usize_min(dst: &mut usize, value: Option<usize>, min: usize) {
    if let Some(v) = value {
        *dst = v.max(min);
    }
}

fn set_opt_u64_min(dst: &mut u64, value: Option<u64>, min: u64) {
    if let Some(v) = value {
        *dst = v.max(min);
    }
}
