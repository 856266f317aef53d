//! Data transfer objects for service inputs and outputs
//!
//! This module provides:
//! - Request DTOs with validation
//! - Response DTOs for serializing results
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AuditLogQuery, CreatePlatformProfileRequest, CreatePromptTemplateRequest,
    CreateVoiceProfileRequest, GenerateIdeaRequest, GeneratePostRequest, GenerateVariantRequest,
    RepurposePostRequest, RewritePostRequest, SourceType, UpdatePlatformProfileRequest,
    UpdatePromptTemplateRequest, UpdateVoiceProfileRequest,
};

pub use responses::{
    AuditLogResponse, IdeaGenerationResponse, PlatformProfileResponse, PostGenerationResponse,
    PromptTemplateResponse, VariantGenerationResponse, VoiceProfileResponse,
};
