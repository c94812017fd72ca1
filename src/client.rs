//! AI Lang API clients.
//!
//! [`AiLangClient`] is async, [`BlockingAiLangClient`] blocks the calling
//! thread. Both are built with [`AiLangClientBuilder`] and share request
//! preparation and error mapping; only the concurrency contract differs.

pub mod blocking;
pub mod builder;
pub mod core;
pub mod endpoint;

pub use blocking::BlockingAiLangClient;
pub use builder::AiLangClientBuilder;
pub use core::AiLangClient;
pub use endpoint::{CHAT_PATH, EMBED_PATH, REQUEST_ID_HEADER};
