use crate::{Error, ErrorContext, Result};
use std::env;
use std::fmt;

/// Keyring service under which API keys are looked up (account = client id).
const KEYRING_SERVICE: &str = "relevai";

/// Variables that, when any is set, mean the environment intends a credential.
const CREDENTIAL_SETTINGS: [&str; 4] = [
    "RELEVAI_AUTH_URL",
    "RELEVAI_CLIENT_ID",
    "RELEVAI_API_KEY",
    "RELEVAI_CLIENT_SECRET",
];

/// Identity used to obtain access tokens.
///
/// - `ApiKey`: a long-lived API key exchanged through the `refresh_token`
///   grant. Regular RelevAI users hold these.
/// - `ClientCredentials`: client id + secret exchanged through the
///   `client_credentials` grant. Meant for backend services and automation.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey {
        api_key: String,
        client_id: String,
        client_secret: Option<String>,
        auth_url: String,
    },
    ClientCredentials {
        client_id: String,
        client_secret: String,
        auth_url: String,
    },
}

impl Credential {
    pub fn api_key(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Self {
        Credential::ApiKey {
            api_key: api_key.into(),
            client_id: client_id.into(),
            client_secret: None,
            auth_url: auth_url.into(),
        }
    }

    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Self {
        Credential::ClientCredentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: auth_url.into(),
        }
    }

    /// Attach (or replace) the client secret sent with the token request.
    pub fn with_client_secret(self, secret: impl Into<String>) -> Self {
        match self {
            Credential::ApiKey {
                api_key,
                client_id,
                auth_url,
                ..
            } => Credential::ApiKey {
                api_key,
                client_id,
                client_secret: Some(secret.into()),
                auth_url,
            },
            Credential::ClientCredentials {
                client_id,
                auth_url,
                ..
            } => Credential::ClientCredentials {
                client_id,
                client_secret: secret.into(),
                auth_url,
            },
        }
    }

    /// Build a credential from the environment.
    ///
    /// `RELEVAI_AUTH_URL` and `RELEVAI_CLIENT_ID` are required. The API key is
    /// looked up in the system keyring first (service `relevai`, account =
    /// client id), then in `RELEVAI_API_KEY`. Without an API key,
    /// `RELEVAI_CLIENT_SECRET` selects the client-credentials form.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), Self::keyring_api_key)
    }

    /// Like [`Credential::from_env`], but `Ok(None)` when none of
    /// `RELEVAI_AUTH_URL`, `RELEVAI_CLIENT_ID`, `RELEVAI_API_KEY` or
    /// `RELEVAI_CLIENT_SECRET` is set. A partial set is still an error.
    pub fn from_env_optional() -> Result<Option<Self>> {
        Self::optional_from_lookup(|key| env::var(key).ok(), Self::keyring_api_key)
    }

    pub(crate) fn optional_from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        stored_api_key: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>> {
        let configured = CREDENTIAL_SETTINGS
            .iter()
            .any(|key| lookup(key).is_some_and(|v| !v.trim().is_empty()));
        if !configured {
            return Ok(None);
        }
        Self::from_lookup(lookup, stored_api_key).map(Some)
    }

    pub(crate) fn keyring_api_key(client_id: &str) -> Option<String> {
        keyring::Entry::new(KEYRING_SERVICE, client_id)
            .ok()?
            .get_password()
            .ok()
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        stored_api_key: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                Error::configuration_with_context(
                    "missing credential setting",
                    ErrorContext::new()
                        .with_field_path(key.to_string())
                        .with_source("credential"),
                )
            })
        };
        let auth_url = required("RELEVAI_AUTH_URL")?;
        let client_id = required("RELEVAI_CLIENT_ID")?;
        let client_secret = lookup("RELEVAI_CLIENT_SECRET").filter(|v| !v.is_empty());
        let api_key = stored_api_key(client_id.as_str())
            .or_else(|| lookup("RELEVAI_API_KEY"))
            .filter(|v| !v.is_empty());

        match (api_key, client_secret) {
            (Some(api_key), client_secret) => Ok(Credential::ApiKey {
                api_key,
                client_id,
                client_secret,
                auth_url,
            }),
            (None, Some(client_secret)) => Ok(Credential::ClientCredentials {
                client_id,
                client_secret,
                auth_url,
            }),
            (None, None) => Err(Error::configuration_with_context(
                "no API key or client secret found",
                ErrorContext::new()
                    .with_field_path("RELEVAI_API_KEY")
                    .with_details("set RELEVAI_API_KEY or RELEVAI_CLIENT_SECRET")
                    .with_source("credential"),
            )),
        }
    }

    pub fn auth_url(&self) -> &str {
        match self {
            Credential::ApiKey { auth_url, .. } | Credential::ClientCredentials { auth_url, .. } => {
                auth_url
            }
        }
    }

    pub fn client_id(&self) -> &str {
        match self {
            Credential::ApiKey { client_id, .. }
            | Credential::ClientCredentials { client_id, .. } => client_id,
        }
    }

    /// OAuth2 grant used to obtain a token with this credential.
    pub fn grant_type(&self) -> &'static str {
        match self {
            Credential::ApiKey { .. } => "refresh_token",
            Credential::ClientCredentials { .. } => "client_credentials",
        }
    }

    /// Form fields POSTed to `auth_url`.
    pub(crate) fn token_request_form(&self) -> Vec<(&'static str, &str)> {
        match self {
            Credential::ApiKey {
                api_key,
                client_id,
                client_secret,
                ..
            } => {
                let mut form = vec![
                    ("grant_type", self.grant_type()),
                    ("client_id", client_id.as_str()),
                    ("refresh_token", api_key.as_str()),
                ];
                if let Some(secret) = client_secret {
                    form.push(("client_secret", secret.as_str()));
                }
                form
            }
            Credential::ClientCredentials {
                client_id,
                client_secret,
                ..
            } => vec![
                ("grant_type", self.grant_type()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ],
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ApiKey {
                client_id,
                client_secret,
                auth_url,
                ..
            } => f
                .debug_struct("ApiKey")
                .field("api_key", &"<redacted>")
                .field("client_id", client_id)
                .field("client_secret", &client_secret.as_ref().map(|_| "<redacted>"))
                .field("auth_url", auth_url)
                .finish(),
            Credential::ClientCredentials {
                client_id,
                auth_url,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .field("auth_url", auth_url)
                .finish(),
        }
    }
}
