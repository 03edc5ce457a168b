//! Credentials collaborator
//!
//! The transport never mints or refreshes tokens itself; it asks an injected
//! [`CredentialsProvider`] for a ready-to-send header pair on every attempt.

/// Supplies the authorization header attached to every request
pub trait CredentialsProvider: Send + Sync {
    /// The header name/value pair to attach, e.g. `("Authorization", "Bearer ...")`
    fn authorization_header(&self) -> (String, String);
}

/// API-key credentials sent under a custom header name
#[derive(Debug, Clone)]
pub struct ApiKeyCredentials {
    header_name: String,
    prefix: Option<String>,
    key: String,
}

impl ApiKeyCredentials {
    /// Create credentials sent as `Authorization: <key>`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            header_name: "Authorization".to_string(),
            prefix: None,
            key: key.into(),
        }
    }

    /// Send the key under a different header name
    #[must_use]
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Prepend a prefix to the key value, e.g. `"ApiKey "`
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl CredentialsProvider for ApiKeyCredentials {
    fn authorization_header(&self) -> (String, String) {
        let value = format!("{}{}", self.prefix.as_deref().unwrap_or(""), self.key);
        (self.header_name.clone(), value)
    }
}

/// Static bearer-token credentials
#[derive(Debug, Clone)]
pub struct BearerCredentials {
    token: String,
}

impl BearerCredentials {
    /// Create credentials sent as `Authorization: Bearer <token>`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialsProvider for BearerCredentials {
    fn authorization_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.token),
        )
    }
}
