//! Chat messages in the AI Lang wire format.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Base64-encoded images for multimodal models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Tool, text)
    }

    pub fn with_image_base64(mut self, data: impl Into<String>) -> Self {
        self.images.get_or_insert_with(Vec::new).push(data.into());
        self
    }

    pub fn with_image_file(self, path: impl AsRef<Path>) -> crate::Result<Self> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            crate::Error::configuration_with_context(
                format!("cannot read image: {}", e),
                crate::ErrorContext::new().with_field_path(path.as_ref().display().to_string()),
            )
        })?;
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(self.with_image_base64(data))
    }

    pub fn contains_image(&self) -> bool {
        self.images.as_ref().is_some_and(|i| !i.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}
