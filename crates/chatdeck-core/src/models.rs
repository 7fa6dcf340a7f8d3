//! Catalog of selectable chat models.

use serde::Serialize;

use crate::error::CoreError;

/// Model selected when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// A model the user can choose in the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    /// Human-readable name.
    pub label: &'static str,
    /// Provider-qualified model identifier.
    pub value: &'static str,
    /// Icon name for the provider.
    pub icon: &'static str,
}

pub const MODELS: &[ModelOption] = &[
    ModelOption {
        label: "GPT-4o",
        value: "openai/gpt-4o",
        icon: "i-simple-icons-openai",
    },
    ModelOption {
        label: "Claude Sonnet 4",
        value: "anthropic/claude-sonnet-4",
        icon: "i-simple-icons-anthropic",
    },
    ModelOption {
        label: "Gemini 2.5 Flash",
        value: "google/gemini-2.5-flash",
        icon: "i-simple-icons-google",
    },
];

/// Look up a model by its identifier.
pub fn find_model(value: &str) -> Result<&'static ModelOption, CoreError> {
    MODELS
        .iter()
        .find(|model| model.value == value)
        .ok_or_else(|| CoreError::UnknownModel(value.to_string()))
}
