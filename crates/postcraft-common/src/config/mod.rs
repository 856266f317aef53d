//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuditConfig, ConfigError, DatabaseConfig, Environment,
    GenerationConfig,
};
