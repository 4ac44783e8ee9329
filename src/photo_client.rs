use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use crate::configuration::parse_base_url;
use crate::domain::PhoneNumber;

#[derive(Debug, Clone)]
pub struct PhotoLookupClient {
    http_client: Client,
    lookup_url: Url,
    api_host: String,
    api_key: SecretString,
}

#[derive(thiserror::Error, Debug)]
pub enum PhotoLookupError {
    #[error("Failed to reach the photo lookup API.")]
    Transport(#[from] reqwest::Error),
    #[error("The photo lookup API returned status {0}.")]
    Rejected(StatusCode),
    #[error("The photo lookup API returned a non-JSON payload.")]
    MalformedResponse(#[source] serde_json::Error),
}

impl PhotoLookupClient {
    pub fn new(
        base_url: &str,
        api_host: String,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let base_url = parse_base_url(base_url)?;

        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            lookup_url: base_url.join("user-profile-picture")?,
            api_host,
            api_key,
        })
    }

    /// Returns the public profile photo url, or `None` when the number has no
    /// visible photo.
    #[tracing::instrument(name = "Looking up a WhatsApp profile photo", skip(self))]
    pub async fn lookup(&self, number: &PhoneNumber) -> Result<Option<String>, PhotoLookupError> {
        let response = self
            .http_client
            .get(self.lookup_url.clone())
            .query(&[("number", number.as_ref())])
            .header("x-rapidapi-key", self.api_key.expose_secret())
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PhotoLookupError::Rejected(status));
        }

        let payload = response.bytes().await?;
        let data: serde_json::Value =
            serde_json::from_slice(&payload).map_err(PhotoLookupError::MalformedResponse)?;

        Ok(profile_picture_url(&data))
    }
}

fn profile_picture_url(data: &serde_json::Value) -> Option<String> {
    if data.get("exists") != Some(&serde_json::Value::Bool(true)) {
        return None;
    }

    data.get("profile_picture_url")
        .and_then(serde_json::Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
}
