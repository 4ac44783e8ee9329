mod health_check;
mod helpers;
mod subscriptions;
mod whatsapp_photo;

pub use health_check::health_check;
pub use subscriptions::{SubscribeError, subscribe, subscribe_json_config};
pub use whatsapp_photo::{photo_json_config, whatsapp_photo, whatsapp_photo_preflight};
