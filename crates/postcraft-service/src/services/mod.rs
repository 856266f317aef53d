//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and run each flow strictly in
//! sequence: resolve configuration, compose, generate, parse, audit.

pub mod audit;
pub mod context;
pub mod error;
pub mod generation;
pub mod profile;
pub mod source_text;
pub mod template;

// Re-export all services for convenience
pub use audit::AuditService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use generation::GenerationService;
pub use profile::ProfileService;
pub use source_text::truncate_source;
pub use template::TemplateService;
