//! Active-project listing
//!
//! Fetches a single page of active projects with the bearer token and
//! returns the records sorted ascending by identifier for stable display.
//! There is deliberately no pagination loop across pages.

use crate::auth::token::BearerToken;
use crate::core::config::API_BASE_URL;
use crate::core::error::RemediateError;
use crate::projects::ProjectRecord;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Wire shape of the projects endpoint response
#[derive(Debug, Deserialize)]
struct ProjectPage {
    docs: Vec<ProjectRecord>,
}

/// Fetches the page of active projects
pub struct ProjectLister {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ProjectLister {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectLister {
    /// Create a lister against the production API
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a lister against a specific base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the first page of active projects, ordered by identifier.
    ///
    /// An empty result set is not an error; it just yields nothing to
    /// select.
    ///
    /// # Errors
    ///
    /// - `RemediateError::ListingFailed` - non-2xx response
    /// - `RemediateError::ListingResponseMalformed` - transport failure or
    ///   a body that does not match the expected shape
    pub async fn list_active(
        &self,
        token: &BearerToken,
        limit: usize,
    ) -> Result<Vec<ProjectRecord>, RemediateError> {
        let url = format!("{}/projects", self.base_url);
        let query = [
            ("page", "1".to_string()),
            ("limit", limit.to_string()),
            ("filter", "active".to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| RemediateError::ListingResponseMalformed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemediateError::ListingFailed {
                status: status.as_u16(),
            });
        }

        let page: ProjectPage =
            response
                .json()
                .await
                .map_err(|e| RemediateError::ListingResponseMalformed {
                    message: e.to_string(),
                })?;

        let mut projects = page.docs;
        projects.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(projects)
    }
}
