//! Static configuration for the remediation workflow
//!
//! Credentials are environment-sourced, loaded once at startup and immutable
//! for the process lifetime. Secret material is held as `SecretString` so it
//! never appears in debug output or logs.

use crate::core::error::RemediateError;
use secrecy::SecretString;
use std::env;

/// Base URL of the project-management API
pub const API_BASE_URL: &str = "https://desman4.smehost.net/api/v4";

/// SSH base of the managed source repositories
pub const GIT_REMOTE_BASE: &str = "git@gitlab.smehost.net:desmanv4-managed";

/// Branch every remediation clone checks out
pub const REMEDIATION_BRANCH: &str = "main";

/// Commit message used when publishing remediation results
pub const COMMIT_MESSAGE: &str = "chore(deps): automated npm audit fix";

/// Dependency-manifest filename searched for in cloned trees
pub const MANIFEST_FILENAME: &str = "package.json";

/// OAuth scope requested during the token exchange
pub const OAUTH_SCOPE: &str = "full_api";

/// Default page size for the project listing
pub const DEFAULT_PAGE_LIMIT: usize = 20;

pub const ENV_AUTH_CLIENT: &str = "AUTH_CLIENT";
pub const ENV_AUTH_SECRET: &str = "AUTH_SECRET";
pub const ENV_AUTH_USER: &str = "AUTH_USER";
pub const ENV_AUTH_PASS: &str = "AUTH_PASS";
pub const ENV_TOTP_SECRET: &str = "TOTP_SECRET";

/// Long-lived credentials for the password-grant token exchange
#[derive(Debug)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub username: String,
    pub password: SecretString,
    pub totp_secret: SecretString,
}

impl Credentials {
    /// Load all required credentials from environment variables.
    ///
    /// Every variable is required; a missing or empty value is a
    /// configuration error, surfaced before any network call.
    pub fn from_env() -> Result<Self, RemediateError> {
        Ok(Self {
            client_id: require_env(ENV_AUTH_CLIENT)?,
            client_secret: SecretString::new(require_env(ENV_AUTH_SECRET)?.into()),
            username: require_env(ENV_AUTH_USER)?,
            password: SecretString::new(require_env(ENV_AUTH_PASS)?.into()),
            totp_secret: SecretString::new(require_env(ENV_TOTP_SECRET)?.into()),
        })
    }
}

fn require_env(name: &str) -> Result<String, RemediateError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RemediateError::MissingEnv {
            name: name.to_string(),
        }),
    }
}
