//! Resource library HTTP client.

use reqwest::{header, Client};

use crate::api::types::{Resource, ResourceListResponse};
use crate::error::{Error, Result};

/// Client for the community resource library API.
///
/// Only the resource listing surface is consumed here; the rest of the
/// community API (posts, events, quizzes) is out of scope for this tool.
pub struct LibraryApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LibraryApi {
    pub fn new(client: Client, base_url: String, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token,
        }
    }

    /// Fetch the full resource library listing.
    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        let url = format!("{}/resources", self.base_url);

        let mut request = self.client.get(&url).header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!(
                "resource listing failed with HTTP {}",
                status
            )));
        }

        let listing: ResourceListResponse = response.json().await?;
        Ok(listing.into_resources())
    }

    /// Look up a single resource by id.
    pub async fn get_resource(&self, id: u64) -> Result<Resource> {
        self.list_resources()
            .await?
            .into_iter()
            .find(|resource| resource.id == id)
            .ok_or_else(|| Error::ResourceNotFound(id.to_string()))
    }
}
