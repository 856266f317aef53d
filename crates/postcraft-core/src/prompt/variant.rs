//! Variant prompt
//!
//! Variants are generated from a fixed prompt around the original post rather
//! than from the layered composer.

use super::user_input::present;
use crate::entities::OriginalPost;
use crate::value_objects::VariationType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPrompt {
    pub prompt: String,
    /// Instruction actually used, explicit or built-in
    pub instruction: String,
}

/// Render the variant prompt; an explicit non-empty instruction overrides
/// the built-in one for the variation type
pub fn compose_variant(
    original: &OriginalPost,
    variation_type: VariationType,
    instruction: Option<&str>,
) -> VariantPrompt {
    let instruction = present(instruction)
        .unwrap_or_else(|| variation_type.default_instruction())
        .to_string();
    let platform = original.platform.as_str();

    let prompt = format!(
        "You are a social media content expert. Your task is to create a variant of the following post.\n\
         \n\
         ORIGINAL POST:\n\
         {content}\n\
         \n\
         PLATFORM: {platform}\n\
         \n\
         VARIATION INSTRUCTION:\n\
         {instruction}\n\
         \n\
         Create a variant that:\n\
         1. Maintains the core message and value\n\
         2. Follows the variation instruction\n\
         3. Is appropriate for {platform}\n\
         4. Feels fresh and different from the original\n\
         \n\
         Respond with JSON:\n\
         {{\n  \
         \"content\": \"The variant post content\",\n  \
         \"hashtags\": [\"optional\", \"hashtags\"],\n  \
         \"variation_description\": \"Brief description of what was changed\"\n\
         }}",
        content = original.content,
    );

    VariantPrompt { prompt, instruction }
}
