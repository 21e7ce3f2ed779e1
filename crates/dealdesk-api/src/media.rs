//! Gallery endpoints.
//!
//! The gallery is a flat pool of uploaded images. Uploads go out as one
//! multipart request with a repeated `images` field, one part per file.

use reqwest::multipart::Form;

use crate::catalog::media_part;
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{MediaItemDto, MediaPayload};

impl ApiClient {
    pub async fn list_media(&self, take: usize, skip: usize) -> Result<Vec<MediaItemDto>> {
        self.get_with_params(
            "gallery",
            &[("take", take.to_string()), ("skip", skip.to_string())],
        )
        .await
    }

    pub async fn upload_media(&self, files: &[MediaPayload]) -> Result<()> {
        let mut form = Form::new();
        for file in files {
            form = form.part("images", media_part(file)?);
        }
        self.post_multipart_no_response("gallery", form).await
    }

    pub async fn delete_media(&self, id: &str) -> Result<()> {
        self.delete(&format!("gallery/{id}")).await
    }
}
