//! # relevai
//!
//! Rust client for RelevAI services.
//!
//! ## Overview
//!
//! - **Authentication**: a [`Credential`] (API key or client credentials) is
//!   exchanged for short-lived bearer tokens. [`auth::TokenManager`] caches the
//!   token and renews it when its remaining lifetime drops below a safety
//!   margin, checked on every call.
//! - **AI Lang API**: [`AiLangClient`] (async) and [`BlockingAiLangClient`]
//!   send `chat` and `embed` requests with the current token.
//! - **Serializers**: request and response bodies go through a pluggable
//!   [`serializer::Serializer`] (JSON, zlib-compressed JSON, MessagePack).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relevai::{AiLangClient, Credential, types::{ChatRequest, Message}};
//!
//! #[tokio::main]
//! async fn main() -> relevai::Result<()> {
//!     let credential = Credential::api_key(
//!         "your-api-key",
//!         "your-client-id",
//!         "https://auth.relev.ai/realms/relevai/protocol/openid-connect/token",
//!     );
//!     let client = AiLangClient::new(credential)?;
//!
//!     let reply = client
//!         .chat(&ChatRequest::new("llama3.2", vec![Message::user("Hello!")]))
//!         .await?;
//!     println!("{}", reply.content());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Credentials, tokens and token managers |
//! | [`client`] | Async and blocking AI Lang clients and their builder |
//! | [`serializer`] | Payload codecs |
//! | [`types`] | Chat and embedding wire types |
//! | [`config`] | Client configuration and `RELEVAI_*` environment variables |
//! | [`transport`] | HTTP client construction |

pub mod auth;
pub mod client;
pub mod config;
pub mod serializer;
pub mod transport;
pub mod types;

pub use auth::{Credential, Token, TokenManager};
pub use client::{AiLangClient, AiLangClientBuilder, BlockingAiLangClient};
pub use config::ClientConfig;
pub use serializer::{Codec, Serializer, SerializerKind};
pub use types::{ChatRequest, ChatResponse, EmbedRequest, EmbedResponse, Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{AuthError, Error, ErrorContext};
