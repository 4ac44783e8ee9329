mod new_lead;
mod phone_number;
mod photo_result;

pub use new_lead::NewLead;
pub use phone_number::PhoneNumber;
pub use photo_result::{FALLBACK_PHOTO_URL, PhotoResult};
