use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use tracker_core::PricePolicy;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub pricing: PricePolicy,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// 模拟的网络延迟与随机种子
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub track_delay_ms: u64,
    pub search_delay_ms: u64,
    pub refresh_delay_ms: u64,
    pub bulk_step_delay_ms: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub dir: String,
    pub index: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            track_delay_ms: 1000,
            search_delay_ms: 800,
            refresh_delay_ms: 500,
            bulk_step_delay_ms: 100,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// 不等待、固定种子，测试用
    pub fn instant(seed: u64) -> Self {
        Self {
            track_delay_ms: 0,
            search_delay_ms: 0,
            refresh_delay_ms: 0,
            bulk_step_delay_ms: 0,
            seed: Some(seed),
        }
    }

    pub fn track_delay(&self) -> Duration {
        Duration::from_millis(self.track_delay_ms)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    /// 批量刷新按商品数量累计等待
    pub fn bulk_delay(&self, count: usize) -> Duration {
        Duration::from_millis(self.bulk_step_delay_ms.saturating_mul(count as u64))
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: "public".to_string(),
            index: "public/index.html".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                environment: "development".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            simulation: SimulationConfig::default(),
            pricing: PricePolicy::default(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::from(Path::new(&config_path).join("default")))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let config = builder.build()?;
        let config: Config = config.try_deserialize()?;

        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_load_default_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config").join("default");
        let config: Config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.track_delay_ms, 1000);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.pricing, PricePolicy::default());
        assert_eq!(config.static_files.index, "public/index.html");
    }

    #[test]
    fn bulk_delay_scales_with_count() {
        let simulation = SimulationConfig::default();
        assert_eq!(simulation.bulk_delay(3), Duration::from_millis(300));
        assert_eq!(SimulationConfig::instant(1).bulk_delay(50), Duration::ZERO);
    }
}
