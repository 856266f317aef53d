//! # postcraft-service
//!
//! Application layer: generation flows, profile and template management,
//! audit recording and the DTOs they exchange.

pub mod dto;
pub mod services;

pub use services::{
    AuditService, GenerationService, ProfileService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, TemplateService,
};
