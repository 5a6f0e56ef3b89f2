pub mod gemini;
pub mod local;

use crate::errors::ExtractError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a hosted text-generation model.
///
/// Implementations turn a prompt into a completion string. They do not
/// interpret the completion; parsing is the caller's job.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a completion from a given system and user prompt.
    ///
    /// An empty `system_prompt` means the request carries the user turn only.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ExtractError>;

    /// The model identifier, used for logging and debug output.
    fn model_name(&self) -> &str;
}

dyn_clone::clone_trait_object!(AiProvider);
