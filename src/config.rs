use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub enable_logging: bool,
    pub log_level: String,
    pub alerts_db: DatabaseConfig,
    pub customers_db: DatabaseConfig,
    pub sample_db: DatabaseConfig,
    pub sample_batch_size: u32,
    pub event_log_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            enable_logging: true,
            log_level: "info".to_string(),
            alerts_db: DatabaseConfig::new("Alerts", 1),
            customers_db: DatabaseConfig::new("Customers", 1),
            sample_db: DatabaseConfig::new("SampleDb", 1),
            sample_batch_size: 25,
            event_log_limit: 200,
        }
    }
}

/// Nombre + versión de una base de datos IndexedDB
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    pub version: u32,
}

impl DatabaseConfig {
    pub fn new(name: &str, version: u32) -> Self {
        Self {
            name: name.to_string(),
            version,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
            log_level: option_env!("LOG_LEVEL")
                .unwrap_or("info").to_string(),
            alerts_db: DatabaseConfig {
                name: option_env!("ALERTS_DB_NAME").unwrap_or("Alerts").to_string(),
                version: parse_or(option_env!("ALERTS_DB_VERSION"), defaults.alerts_db.version),
            },
            customers_db: DatabaseConfig {
                name: option_env!("CUSTOMERS_DB_NAME").unwrap_or("Customers").to_string(),
                version: parse_or(option_env!("CUSTOMERS_DB_VERSION"), defaults.customers_db.version),
            },
            sample_db: DatabaseConfig {
                name: option_env!("SAMPLE_DB_NAME").unwrap_or("SampleDb").to_string(),
                version: parse_or(option_env!("SAMPLE_DB_VERSION"), defaults.sample_db.version),
            },
            sample_batch_size: parse_or(option_env!("SAMPLE_BATCH_SIZE"), defaults.sample_batch_size),
            event_log_limit: parse_or(option_env!("EVENT_LOG_LIMIT"), defaults.event_log_limit),
        }
    }

    /// Nivel de log; valores desconocidos caen a Info
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_databases() {
        let config = AppConfig::default();
        assert_eq!(config.alerts_db, DatabaseConfig::new("Alerts", 1));
        assert_eq!(config.customers_db.name, "Customers");
        assert_eq!(config.sample_db.name, "SampleDb");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let mut config = AppConfig::default();
        config.log_level = "debug".to_string();
        assert_eq!(config.log_level(), log::Level::Debug);
        config.log_level = "verbose".to_string();
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn parse_or_keeps_default_on_garbage() {
        assert_eq!(parse_or(Some(" 40 "), 25u32), 40);
        assert_eq!(parse_or(Some("muchos"), 25u32), 25);
        assert_eq!(parse_or::<bool>(None, true), true);
    }
}
