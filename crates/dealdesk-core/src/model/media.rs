// ── Gallery media domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Payload for uploading a file to the gallery. Re-exported from the API
/// crate so callers can stage uploads without depending on it directly.
pub use dealdesk_api::models::MediaPayload as MediaUpload;

/// An image stored in the shared gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: EntityId,
    pub url: String,
    pub name: Option<String>,
    pub size_bytes: Option<u64>,
    pub mime_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl MediaItem {
    /// Best display name: the stored name, else the trailing path segment
    /// of the URL.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            return name;
        }
        self.url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: Option<&str>, url: &str) -> MediaItem {
        MediaItem {
            id: EntityId::from("m1"),
            url: url.into(),
            name: name.map(Into::into),
            size_bytes: None,
            mime_type: None,
            created_at: None,
        }
    }

    #[test]
    fn display_name_prefers_stored_name() {
        let m = item(Some("hero.png"), "https://cdn.example/abc123");
        assert_eq!(m.display_name(), "hero.png");
    }

    #[test]
    fn display_name_falls_back_to_url_segment() {
        let m = item(None, "https://cdn.example/uploads/abc123.png");
        assert_eq!(m.display_name(), "abc123.png");
    }
}
