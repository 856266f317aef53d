//! # postcraft-db
//!
//! Storage layer implementing the postcraft-core repository traits.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repositories (`Pg*Repository`)
//! - In-memory repositories (`InMemory*Repository`) with the same contracts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use postcraft_common::AppConfig;
//! use postcraft_db::{create_pool_from_config, run_migrations, PgVoiceProfileRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = create_pool_from_config(&config.database).await?;
//!     run_migrations(&pool).await?;
//!     let voice_profiles = PgVoiceProfileRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{
    InMemoryAuditLogRepository, InMemoryPlatformProfileRepository,
    InMemoryPromptTemplateRepository, InMemoryVoiceProfileRepository,
};
pub use pool::{create_pool, create_pool_from_config, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgAuditLogRepository, PgPlatformProfileRepository, PgPromptTemplateRepository,
    PgVoiceProfileRepository,
};
