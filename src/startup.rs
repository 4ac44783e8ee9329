use crate::configuration::Settings;
use crate::crm_client::CrmClient;
use crate::photo_client::PhotoLookupClient;
use crate::routes::{
    health_check, photo_json_config, subscribe, subscribe_json_config, whatsapp_photo,
    whatsapp_photo_preflight,
};
use actix_web::dev::Server;
use actix_web::http::Method;
use actix_web::{App, HttpServer, web};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let crm_client = config.crm.client()?;
        if crm_client.is_none() {
            tracing::warn!("CRM credentials are incomplete, subscriptions will be refused.");
        }

        let photo_client = config.photo_lookup.client()?;
        if photo_client.is_none() {
            tracing::warn!("No photo lookup API key, every lookup will get the fallback photo.");
        }

        let address = format!("{}:{}", config.app.host, config.app.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, crm_client, photo_client)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    crm_client: Option<CrmClient>,
    photo_client: Option<PhotoLookupClient>,
) -> Result<Server, anyhow::Error> {
    let crm_client = web::Data::new(crm_client);
    let photo_client = web::Data::new(photo_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/api/subscribe")
                    .app_data(subscribe_json_config())
                    .route(web::post().to(subscribe)),
            )
            .service(
                web::resource("/api/whatsapp-photo")
                    .app_data(photo_json_config())
                    .route(web::post().to(whatsapp_photo))
                    .route(web::method(Method::OPTIONS).to(whatsapp_photo_preflight)),
            )
            .app_data(crm_client.clone())
            .app_data(photo_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
