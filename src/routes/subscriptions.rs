use actix_web::{HttpResponse, ResponseError, error::InternalError, http::StatusCode, web};
use anyhow::Context;
use serde_json::json;

use crate::{crm_client::CrmClient, domain::NewLead};

use super::helpers::error_chain_fmt;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody {
    pub user_email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("The CRM credentials are not configured.")]
    ConfigurationError,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::ConfigurationError | SubscribeError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Details stay in the logs; callers only see a stable message.
        let message = match self {
            SubscribeError::ValidationError(message) => message.as_str(),
            SubscribeError::ConfigurationError => "Server configuration error.",
            SubscribeError::UnexpectedError(_) => "Could not subscribe user.",
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Payloads that cannot be read as a lead get the same JSON body as missing fields.
pub fn subscribe_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error.message = %err, "Unreadable subscription payload");
        let response =
            SubscribeError::ValidationError("Email and phone are required".into()).error_response();
        InternalError::from_response(err, response).into()
    })
}

#[tracing::instrument(
    name = "Subscribing a new lead.",
    skip(body, crm_client),
    fields(
        lead_email = ?body.user_email,
        lead_phone = ?body.phone_number
    )
)]
pub async fn subscribe(
    body: web::Json<SubscribeBody>,
    crm_client: web::Data<Option<CrmClient>>,
) -> Result<HttpResponse, SubscribeError> {
    let SubscribeBody {
        user_email,
        phone_number,
    } = body.into_inner();
    let lead = NewLead::parse(user_email, phone_number).map_err(SubscribeError::ValidationError)?;

    let Some(crm_client) = crm_client.get_ref().as_ref() else {
        tracing::error!("Missing CRM base url, API token or tag id.");
        return Err(SubscribeError::ConfigurationError);
    };

    let contact_id = crm_client
        .create_contact(&lead)
        .await
        .context("Failed to create the lead's contact in the CRM.")?;

    // A contact created above stays in the CRM untagged if this fails.
    crm_client
        .tag_contact(&contact_id)
        .await
        .with_context(|| format!("Failed to tag CRM contact {contact_id}."))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
