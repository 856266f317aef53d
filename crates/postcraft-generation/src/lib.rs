//! # postcraft-generation
//!
//! Implementations of the `GenerationClient` port.
//!
//! - [`OpenAiClient`]: one chat-completions round trip against any
//!   OpenAI-compatible endpoint
//! - [`RetryingClient`]: opt-in decorator adding exponential backoff with
//!   jitter around another client

pub mod openai;
pub mod retry;

pub use openai::OpenAiClient;
pub use retry::{RetryPolicy, RetryingClient};
