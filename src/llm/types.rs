//! Message types for LLM communication.
//!
//! Defines the role-tagged messages used by chat-style models and the
//! decoding parameters shared by both call shapes.

use serde::{Deserialize, Serialize};

/// Sampling temperature; zero keeps generation deterministic.
pub const TEMPERATURE: f32 = 0.0;

/// Nucleus sampling mass.
pub const TOP_P: f32 = 1.0;

/// Token-length ceiling for a single completion.
pub const MAX_TOKENS: u32 = 1024;

/// Literal stop sequence that truncates runaway continuation.
pub const STOP_SEQUENCE: &str = "You:";

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing context and instructions.
    System,
    /// User message (human input).
    User,
}

impl Role {
    /// Returns the role as a string for API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Decoding parameters sent with every LLM request.
///
/// The pipeline always uses [`DecodingParams::deterministic`]; the struct
/// exists so clients serialize one shape for both protocols.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

impl DecodingParams {
    /// Temperature 0, top-p 1.0, 1024 tokens, stop at `"You:"`.
    pub fn deterministic() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
            stop: vec![STOP_SEQUENCE.to_string()],
        }
    }
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self::deterministic()
    }
}
