use serde::Serialize;

/// Generic avatar served whenever a real profile photo cannot be determined.
pub const FALLBACK_PHOTO_URL: &str = "https://media.istockphoto.com/id/1337144146/vector/default-avatar-profile-icon-vector.jpg?s=612x612&w=0&k=20&c=BIbFwuv7FxTWvh5S3vB6bkT0Qv8Vn8N5Ffseq84ClGI=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoResult {
    pub success: bool,
    pub result: String,
    pub is_photo_private: bool,
}

impl PhotoResult {
    pub fn found(url: String) -> Self {
        Self {
            success: true,
            result: url,
            is_photo_private: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            success: true,
            result: FALLBACK_PHOTO_URL.to_owned(),
            is_photo_private: true,
        }
    }
}

impl From<Option<String>> for PhotoResult {
    fn from(url: Option<String>) -> Self {
        url.map_or_else(Self::fallback, Self::found)
    }
}
