//! Bearer-token acquisition via the password-grant exchange
//!
//! A single form-encoded POST carrying the long-lived credentials plus the
//! current one-time passcode as the `mfatoken` multi-factor field. The
//! exchange is attempted exactly once: the passcode is single-use and
//! already time-boxed, so a rejected exchange aborts the run and the
//! operator re-invokes.

use crate::auth::otp::Passcode;
use crate::core::config::{API_BASE_URL, Credentials, OAUTH_SCOPE};
use crate::core::error::RemediateError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Short-lived bearer token returned by the exchange.
///
/// Held only in memory for the duration of one run. There is no refresh
/// logic; a run outliving `expires_in` is not supported.
#[derive(Debug, Deserialize)]
pub struct BearerToken {
    pub token_type: String,
    pub access_token: SecretString,
    pub expires_in: u64,
    pub refresh_token: SecretString,
}

/// Performs the password-grant token exchange
pub struct TokenAcquirer {
    client: reqwest::Client,
    base_url: String,
}

impl Default for TokenAcquirer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenAcquirer {
    /// Create an acquirer against the production API
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create an acquirer against a specific base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Exchange credentials plus the current passcode for a bearer token.
    ///
    /// # Errors
    ///
    /// - `RemediateError::AuthenticationFailed` - exchange rejected (non-2xx)
    /// - `RemediateError::AuthResponseMalformed` - transport failure, or a
    ///   2xx body missing any of the four expected fields
    pub async fn acquire(
        &self,
        credentials: &Credentials,
        passcode: &Passcode,
    ) -> Result<BearerToken, RemediateError> {
        let url = format!("{}/oauth/token", self.base_url);

        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.expose_secret()),
            ("scope", OAUTH_SCOPE),
            ("grant_type", "password"),
            ("mfatoken", passcode.code.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| RemediateError::AuthResponseMalformed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemediateError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        response
            .json::<BearerToken>()
            .await
            .map_err(|e| RemediateError::AuthResponseMalformed {
                message: e.to_string(),
            })
    }
}

/// Masks a token for safe logging.
///
/// Shows only the first 3 and last 3 characters for identification.
/// Tokens shorter than 10 characters are fully masked as "****".
pub fn mask_token(token: &str) -> String {
    if token.len() < 10 {
        return "****".to_string();
    }

    let prefix = &token[..3];
    let suffix = &token[token.len() - 3..];
    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Credentials {
        Credentials {
            client_id: "client-1".to_string(),
            client_secret: SecretString::new("s3cret".into()),
            username: "operator".to_string(),
            password: SecretString::new("hunter2".into()),
            totp_secret: SecretString::new("GEZDGNBVGY3TQOJQ".into()),
        }
    }

    fn test_passcode() -> Passcode {
        Passcode {
            code: "287082".to_string(),
            expires_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_acquire_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("scope=full_api"))
            .and(body_string_contains("mfatoken=287082"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "access_token": "access-token-value-1234",
                "expires_in": 3600,
                "refresh_token": "refresh-token-value"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let acquirer = TokenAcquirer::with_base_url(server.uri());
        let token = acquirer
            .acquire(&test_credentials(), &test_passcode())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.access_token.expose_secret(), "access-token-value-1234");
        assert_eq!(token.refresh_token.expose_secret(), "refresh-token-value");
    }

    #[tokio::test]
    async fn test_acquire_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;

        let acquirer = TokenAcquirer::with_base_url(server.uri());
        let error = acquirer
            .acquire(&test_credentials(), &test_passcode())
            .await
            .expect_err("exchange rejected");

        assert!(matches!(
            error,
            RemediateError::AuthenticationFailed { status: 401 }
        ));
        assert!(error.is_fatal());
    }

    #[tokio::test]
    async fn test_acquire_missing_field_is_malformed() {
        let server = MockServer::start().await;

        // 2xx body without refresh_token must not produce a token
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "access_token": "access-token-value-1234",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let acquirer = TokenAcquirer::with_base_url(server.uri());
        let error = acquirer
            .acquire(&test_credentials(), &test_passcode())
            .await
            .expect_err("body missing a field");

        assert_eq!(error.code(), "AUTH_RESPONSE_MALFORMED");
    }

    #[test]
    fn test_mask_token_short() {
        assert_eq!(mask_token(""), "****");
        assert_eq!(mask_token("short"), "****");
    }

    #[test]
    fn test_mask_token_long() {
        assert_eq!(mask_token("abcdef123456"), "abc...456");
    }
}
