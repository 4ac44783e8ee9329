use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_string_from_number;

use crate::configuration::parse_base_url;
use crate::domain::NewLead;

/// Contact status the CRM uses for an active subscriber.
const ACTIVE_STATUS: u8 = 1;

#[derive(Debug, Clone)]
pub struct CrmClient {
    http_client: Client,
    contacts_url: Url,
    contact_tags_url: Url,
    api_token: SecretString,
    tag_id: String,
}

#[derive(thiserror::Error, Debug)]
pub enum CrmError {
    #[error("Failed to reach the CRM API.")]
    Transport(#[from] reqwest::Error),
    #[error("The CRM API rejected `{operation}` with status {status}.")]
    Rejected {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("The CRM API returned an unexpected `{operation}` payload.")]
    MalformedResponse {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
struct CreateContactRequest<'a> {
    contact: ContactUnit<'a>,
}

#[derive(Serialize)]
struct ContactUnit<'a> {
    email: &'a str,
    phone: &'a str,
    status: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactTagRequest<'a> {
    contact_tag: ContactTagUnit<'a>,
}

#[derive(Serialize)]
struct ContactTagUnit<'a> {
    contact: &'a str,
    tag: &'a str,
}

#[derive(Deserialize)]
struct CreateContactResponse {
    contact: CreatedContact,
}

#[derive(Deserialize)]
struct CreatedContact {
    #[serde(deserialize_with = "deserialize_string_from_number")]
    id: String,
}

impl CrmClient {
    pub fn new(
        base_url: &str,
        api_token: SecretString,
        tag_id: String,
        timeout: Option<Duration>,
    ) -> Result<Self, anyhow::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = parse_base_url(base_url)?;

        Ok(Self {
            http_client: builder.build()?,
            contacts_url: base_url.join("api/3/contacts")?,
            contact_tags_url: base_url.join("api/3/contactTags")?,
            api_token,
            tag_id,
        })
    }

    /// Creates an active contact for the lead and returns the identifier the CRM assigned.
    #[tracing::instrument(name = "Creating a CRM contact", skip(self, lead), fields(lead_email = %lead.email))]
    pub async fn create_contact(&self, lead: &NewLead) -> Result<String, CrmError> {
        const OPERATION: &str = "create contact";

        let body = CreateContactRequest {
            contact: ContactUnit {
                email: &lead.email,
                phone: &lead.phone,
                status: ACTIVE_STATUS,
            },
        };

        let payload = self.post(OPERATION, &self.contacts_url, &body).await?;
        let created: CreateContactResponse = serde_json::from_slice(&payload)
            .map_err(|source| CrmError::MalformedResponse {
                operation: OPERATION,
                source,
            })?;

        Ok(created.contact.id)
    }

    #[tracing::instrument(name = "Tagging a CRM contact", skip(self), fields(tag_id = %self.tag_id))]
    pub async fn tag_contact(&self, contact_id: &str) -> Result<(), CrmError> {
        let body = ContactTagRequest {
            contact_tag: ContactTagUnit {
                contact: contact_id,
                tag: &self.tag_id,
            },
        };

        self.post("add tag", &self.contact_tags_url, &body).await?;
        Ok(())
    }

    async fn post<B: Serialize>(
        &self,
        operation: &'static str,
        url: &Url,
        body: &B,
    ) -> Result<Vec<u8>, CrmError> {
        let response = self
            .http_client
            .post(url.clone())
            .header("Api-Token", self.api_token.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&payload).into_owned();
            tracing::error!(%status, error.body = %body, "CRM API rejected `{}`", operation);
            return Err(CrmError::Rejected {
                operation,
                status,
                body,
            });
        }

        Ok(payload.to_vec())
    }
}
