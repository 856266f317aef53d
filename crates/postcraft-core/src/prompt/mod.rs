//! Prompt composition
//!
//! Turns versioned configuration plus user input into the exact text sent to
//! the generation backend. Everything here is pure and deterministic.

mod composer;
mod user_input;
mod variant;

pub use composer::{compose, ComposedPrompt, CompositionInput, VersionManifest};
pub use user_input::UserInput;
pub use variant::{compose_variant, VariantPrompt};
