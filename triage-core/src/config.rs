use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct TriageConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub embedding: EmbeddingSettings,
    pub board: BoardConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingSettings {
    pub model: String,
    pub dimensions: u32,
}

/// The aggregate question record is addressed by a fixed clinic identifier.
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub clinic_id: String,
    #[serde(default = "default_query_log_limit")]
    pub query_log_limit: u32,
}

fn default_query_log_limit() -> u32 {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8780,
        }
    }
}

impl TriageConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        s.try_deserialize()
    }
}
