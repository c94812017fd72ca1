//! Wire types for the AI Lang API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role, text and optional images |
//! | [`ChatRequest`] / [`ChatResponse`] | `api/chat` payloads |
//! | [`EmbedRequest`] / [`EmbedResponse`] | `api/embed` payloads |
//!
//! ```rust
//! use relevai::types::{ChatRequest, EmbedRequest, Message};
//!
//! let chat = ChatRequest::new(
//!     "llama3.2",
//!     vec![Message::system("Answer briefly."), Message::user("Why is the sky blue?")],
//! )
//! .with_temperature(0.2);
//! assert!(!chat.stream);
//!
//! let embed = EmbedRequest::batch("nomic-embed-text", vec!["first".into(), "second".into()]);
//! assert_eq!(embed.input.len(), 2);
//! ```

pub mod chat;
pub mod embed;
pub mod message;

pub use chat::{ChatRequest, ChatResponse};
pub use embed::{EmbedInput, EmbedRequest, EmbedResponse};
pub use message::{Message, MessageRole};
