use crate::error::{TextAnalyticsError, TextAnalyticsResult};
use secrecy::{ExposeSecret, SecretString};

/// Header used for Cognitive Services API key authentication.
pub(crate) const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Credential types supported by the Text Analytics client.
#[derive(Clone)]
pub enum TextAnalyticsCredential {
    /// Cognitive Services API key, sent as `Ocp-Apim-Subscription-Key`.
    ApiKey(SecretString),

    /// A pre-acquired Microsoft Entra ID access token, sent as a
    /// `Authorization: Bearer` header.
    BearerToken(SecretString),
}

impl TextAnalyticsCredential {
    /// Create a credential from the `AZURE_TEXT_ANALYTICS_KEY` environment
    /// variable.
    pub fn from_env() -> TextAnalyticsResult<Self> {
        match std::env::var("AZURE_TEXT_ANALYTICS_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::ApiKey(SecretString::from(key))),
            _ => Err(TextAnalyticsError::Auth(
                "no credential provided. Set AZURE_TEXT_ANALYTICS_KEY or pass \
                 a credential to the builder."
                    .into(),
            )),
        }
    }

    /// Create an API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(SecretString::from(key.into()))
    }

    /// Create a bearer token credential from a pre-acquired access token.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(SecretString::from(token.into()))
    }

    /// Resolve the credential to an HTTP header name/value pair.
    pub fn resolve(&self) -> (&'static str, String) {
        match self {
            Self::ApiKey(key) => (API_KEY_HEADER, key.expose_secret().to_string()),
            Self::BearerToken(token) => {
                ("Authorization", format!("Bearer {}", token.expose_secret()))
            }
        }
    }
}

impl std::fmt::Debug for TextAnalyticsCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "TextAnalyticsCredential::ApiKey(****)"),
            Self::BearerToken(_) => write!(f, "TextAnalyticsCredential::BearerToken(****)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn api_key_resolves_to_subscription_key_header() {
        let credential = TextAnalyticsCredential::api_key("secret-key");
        let (name, value) = credential.resolve();
        assert_eq!(name, "Ocp-Apim-Subscription-Key");
        assert_eq!(value, "secret-key");
    }

    #[test]
    fn bearer_token_resolves_to_authorization_header() {
        let credential = TextAnalyticsCredential::bearer_token("token-123");
        let (name, value) = credential.resolve();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer token-123");
    }

    #[test]
    fn debug_redacts_secrets() {
        let credential = TextAnalyticsCredential::api_key("secret-key");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret-key"), "debug output: {debug}");
        assert!(debug.contains("****"), "debug output: {debug}");
    }

    #[test]
    #[serial]
    fn from_env_reads_key() {
        let original = std::env::var("AZURE_TEXT_ANALYTICS_KEY").ok();

        std::env::set_var("AZURE_TEXT_ANALYTICS_KEY", "env-key");
        let credential = TextAnalyticsCredential::from_env().expect("should resolve");
        let (name, value) = credential.resolve();
        assert_eq!(name, "Ocp-Apim-Subscription-Key");
        assert_eq!(value, "env-key");

        match original {
            Some(val) => std::env::set_var("AZURE_TEXT_ANALYTICS_KEY", val),
            None => std::env::remove_var("AZURE_TEXT_ANALYTICS_KEY"),
        }
    }

    #[test]
    #[serial]
    fn from_env_fails_without_key() {
        let original = std::env::var("AZURE_TEXT_ANALYTICS_KEY").ok();

        std::env::remove_var("AZURE_TEXT_ANALYTICS_KEY");
        let result = TextAnalyticsCredential::from_env();
        assert!(matches!(result, Err(TextAnalyticsError::Auth(_))));

        if let Some(val) = original {
            std::env::set_var("AZURE_TEXT_ANALYTICS_KEY", val);
        }
    }
}
