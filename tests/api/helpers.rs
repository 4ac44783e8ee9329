use leadgate::{
    configuration::{Settings, get_configuration},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use secrecy::SecretString;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const TAG_ID: &str = "42";

pub struct TestApp {
    pub address: String,
    pub crm_server: MockServer,
    pub photo_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscription(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_subscription(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_whatsapp_photo(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/whatsapp-photo", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_whatsapp_photo(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/whatsapp-photo", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn preflight_whatsapp_photo(&self) -> reqwest::Response {
        self.api_client
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/api/whatsapp-photo", &self.address),
            )
            .header("Origin", "https://landing.example.com")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawns the app against mock CRM and lookup APIs; `customise` runs last.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let crm_server = MockServer::start().await;
    let photo_server = MockServer::start().await;

    let config = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.app.port = 0;
        c.crm.base_url = Some(crm_server.uri());
        c.crm.api_token = Some(SecretString::from("crm-token"));
        c.crm.tag_id = Some(TAG_ID.to_string());
        c.crm.timeout_ms = Some(2_000);
        c.photo_lookup.base_url = photo_server.uri();
        c.photo_lookup.api_key = Some(SecretString::from("rapidapi-key"));
        c.photo_lookup.timeout_ms = 500;
        customise(&mut c);
        c
    };

    let application = Application::build(config)
        .await
        .expect("Failed to build application.");
    let port = application.get_port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        crm_server,
        photo_server,
        api_client: reqwest::Client::new(),
    }
}
