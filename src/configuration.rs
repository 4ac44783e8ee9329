use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::crm_client::CrmClient;
use crate::photo_client::PhotoLookupClient;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub app: ApplicationSettings,
    #[serde(default)]
    pub crm: CrmSettings,
    pub photo_lookup: PhotoLookupSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub log_filter: String,
}

/// Parses an API base url so that relative routes extend its path instead of
/// replacing the last segment.
pub fn parse_base_url(s: &str) -> Result<Url, anyhow::Error> {
    let mut url = Url::parse(s)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Marketing-automation credentials. Every field may be absent at load time;
/// the subscription route reports a configuration error on each request instead.
#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct CrmSettings {
    pub base_url: Option<String>,
    pub api_token: Option<SecretString>,
    pub tag_id: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl CrmSettings {
    /// `Ok(None)` when any credential is missing or empty.
    pub fn client(&self) -> Result<Option<CrmClient>, anyhow::Error> {
        let base_url = self.base_url.as_deref().filter(|s| !s.is_empty());
        let api_token = self
            .api_token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty());
        let tag_id = self.tag_id.as_deref().filter(|s| !s.is_empty());

        let (Some(base_url), Some(api_token), Some(tag_id)) = (base_url, api_token, tag_id) else {
            return Ok(None);
        };

        let client = CrmClient::new(
            base_url,
            api_token.clone(),
            tag_id.to_owned(),
            self.timeout(),
        )?;
        Ok(Some(client))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct PhotoLookupSettings {
    pub base_url: String,
    pub api_host: String,
    pub api_key: Option<SecretString>,
    pub timeout_ms: u64,
}

impl PhotoLookupSettings {
    /// `Ok(None)` when no API key is configured.
    pub fn client(&self) -> Result<Option<PhotoLookupClient>, anyhow::Error> {
        let Some(api_key) = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
        else {
            return Ok(None);
        };

        let client = PhotoLookupClient::new(
            &self.base_url,
            self.api_host.clone(),
            api_key.clone(),
            self.timeout(),
        )?;
        Ok(Some(client))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

/// Variables already provisioned on existing deployments, mapped onto the settings tree.
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("ACTIVE_CAMPAIGN_API_URL", "crm.base_url"),
    ("ACTIVE_CAMPAIGN_API_TOKEN", "crm.api_token"),
    ("ACTIVE_CAMPAIGN_TAG_ID", "crm.tag_id"),
    ("RAPIDAPI_KEY", "photo_lookup.api_key"),
];

pub fn get_configuration() -> Result<Settings, anyhow::Error> {
    let base_path = std::env::current_dir()?;
    let conf_dir = base_path.join("configuration");
    let env: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let mut builder = config::Config::builder()
        .add_source(config::File::from(conf_dir.join("base.yaml")).required(true))
        .add_source(
            config::File::from(conf_dir.join(format!("{}.yaml", env.as_str()))).required(true),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_"),
        );

    for (var, key) in LEGACY_ENV_KEYS {
        builder = builder.set_override_option(key, std::env::var(var).ok())?;
    }

    let settings = builder.build()?;
    Ok(settings.try_deserialize::<Settings>()?)
}
