use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "RELEVAI_SERIALIZER")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "serializer.compact", "token_manager")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Failures while obtaining an access token from the authorization endpoint.
///
/// `Rejected` means the server answered and refused the credentials; the other
/// kinds mean no usable answer was obtained.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credentials rejected by auth server: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("auth transport failure: {0}")]
    Transport(String),

    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    #[error("invalid access token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// True when the auth server explicitly refused the credentials.
    pub fn is_rejected(&self) -> bool {
        matches!(self, AuthError::Rejected { .. })
    }
}

/// Unified error type for the RelevAI client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("Request failed: HTTP {status}: {body}")]
    Request { status: u16, body: String },

    #[error("Serialization error: {message}{}", format_context(.context))]
    Serialization {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new serialization error with structured context
    pub fn serialization_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Serialization {
            message: msg.into(),
            context,
        }
    }

    /// A serializer backend that was not compiled into this build.
    pub fn backend_unavailable(backend: &str, feature: &str) -> Self {
        Error::configuration_with_context(
            format!("serializer backend '{}' unavailable", backend),
            ErrorContext::new()
                .with_source("serializer")
                .with_details(format!("enable the '{}' cargo feature", feature)),
        )
    }

    /// HTTP status of a failed service call or rejected token request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request { status, .. } => Some(*status),
            Error::Authentication(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Serialization { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::serialization_with_context(e.to_string(), ErrorContext::new().with_source("json"))
    }
}
