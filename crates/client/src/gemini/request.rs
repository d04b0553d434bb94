//! Gemini generateContent request body.

use serde::Serialize;

/// Body of `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// Sampling settings.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerateRequest {
    /// A single user turn holding `prompt`.
    pub fn user_prompt(prompt: impl Into<String>, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content { role: "user".to_string(), parts: vec![Part { text: prompt.into() }] }],
            generation_config,
        }
    }
}
