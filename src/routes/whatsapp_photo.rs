use actix_web::{
    HttpResponse,
    error::InternalError,
    http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS},
    web,
};
use anyhow::Context;
use serde_json::json;

use crate::{
    domain::{PhoneNumber, PhotoResult},
    photo_client::PhotoLookupClient,
};

use super::helpers::allow_any_origin;

#[derive(serde::Deserialize)]
pub struct PhotoBody {
    pub phone: Option<String>,
}

/// An unreadable payload gets the fallback photo rather than a client error.
pub fn photo_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::error!(error.message = %err, "Unreadable WhatsApp photo payload");
        let response = allow_any_origin(HttpResponse::Ok()).json(PhotoResult::fallback());
        InternalError::from_response(err, response).into()
    })
}

/// Always answers with a usable photo: lookup failures are logged and replaced
/// by the fallback avatar.
#[tracing::instrument(name = "Fetching a WhatsApp profile photo.", skip(body, photo_client), fields(phone = ?body.phone))]
pub async fn whatsapp_photo(
    body: web::Json<PhotoBody>,
    photo_client: web::Data<Option<PhotoLookupClient>>,
) -> HttpResponse {
    let Some(phone) = body.into_inner().phone.filter(|p| !p.is_empty()) else {
        return allow_any_origin(HttpResponse::BadRequest()).json(json!({
            "success": false,
            "error": "Número de telefone é obrigatório"
        }));
    };

    let result = match find_photo(&phone, photo_client.get_ref().as_ref()).await {
        Ok(url) => PhotoResult::from(url),
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Serving the fallback photo"
            );
            PhotoResult::fallback()
        }
    };

    allow_any_origin(HttpResponse::Ok()).json(result)
}

pub async fn whatsapp_photo_preflight() -> HttpResponse {
    allow_any_origin(HttpResponse::Ok())
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .finish()
}

async fn find_photo(
    phone: &str,
    photo_client: Option<&PhotoLookupClient>,
) -> Result<Option<String>, anyhow::Error> {
    let Some(photo_client) = photo_client else {
        anyhow::bail!("The photo lookup API key is not configured.");
    };

    let number = PhoneNumber::parse(phone).map_err(anyhow::Error::msg)?;

    photo_client
        .lookup(&number)
        .await
        .with_context(|| format!("Failed to look up the profile photo of {number}."))
}
