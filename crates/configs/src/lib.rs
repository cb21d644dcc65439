use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

fn default_data_file() -> String { "data/db.json".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 storage（支持从环境变量填充数据文件路径）
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供路径，则尝试从环境变量填充
        if self.data_file.trim().is_empty() {
            if let Ok(path) = std::env::var("DATA_FILE") {
                self.data_file = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(anyhow!("storage.data_file 为空；请在 config.toml 或环境变量 DATA_FILE 中提供"));
        }
        if !self.data_file.ends_with(".json") {
            return Err(anyhow!("storage.data_file 必须指向一个 .json 文件"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            worker_threads = 2

            [storage]
            data_file = "state/db.json"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.storage.data_file, "state/db.json");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut cfg: AppConfig = toml::from_str("").expect("parse empty");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.data_file, "data/db.json");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn empty_data_file_filled_from_env() {
        std::env::set_var("DATA_FILE", "env-state/db.json");
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [storage]
            data_file = ""
            "#,
        )
        .expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.storage.data_file, "env-state/db.json");
        std::env::remove_var("DATA_FILE");
    }

    #[test]
    fn rejects_non_json_data_file() {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [storage]
            data_file = "state/db.sqlite"
            "#,
        )
        .expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn zero_worker_threads_normalized() {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = ""
            port = 8080
            worker_threads = 0
            "#,
        )
        .expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }
}
