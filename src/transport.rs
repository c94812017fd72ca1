//! HTTP transport construction shared by the auth and API clients.

pub mod http;

pub use http::{build_async_client, build_blocking_client, TransportError};
