//! Catalog endpoints: categories and products.

use reqwest::multipart::{Form, Part};

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    CategoryDto, CategoryIndexPatch, CategoryUpload, MediaPayload, ProductCreate, ProductDto,
    ProductOrderEntry, ProductQuery, ProductReorderBody, ProductUpdate, VariantDto,
};

impl ApiClient {
    // ── Categories ───────────────────────────────────────────────────

    /// All categories, in backend order. Callers sort by `index`.
    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>> {
        self.get("category").await
    }

    /// Create a category. The response carries the new id.
    pub async fn create_category(&self, upload: &CategoryUpload) -> Result<CategoryDto> {
        let form = category_form(upload)?;
        self.post_multipart("category", form).await
    }

    pub async fn update_category(&self, id: &str, upload: &CategoryUpload) -> Result<()> {
        let form = category_form(upload)?;
        self.patch_multipart_no_response(&format!("category/{id}"), form)
            .await
    }

    /// Persist one category's display position. Used by the reorder commit,
    /// which fires one of these per category concurrently.
    pub async fn set_category_index(&self, id: &str, index: u32) -> Result<()> {
        self.patch_no_response(&format!("category/{id}"), &CategoryIndexPatch::new(index))
            .await
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.delete(&format!("category/{id}")).await
    }

    // ── Products ─────────────────────────────────────────────────────

    /// A page of products under the given filters.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<ProductDto>> {
        let mut params = vec![
            ("take", query.take.to_string()),
            ("skip", query.skip.to_string()),
        ];
        if let Some(q) = &query.q {
            params.push(("q", q.clone()));
        }
        if let Some(category_id) = &query.category_id {
            params.push(("categoryId", category_id.clone()));
        }
        if let Some(state) = &query.state {
            params.push(("state", state.clone()));
        }
        self.get_with_params("products", &params).await
    }

    pub async fn get_product(&self, id: &str) -> Result<ProductDto> {
        self.get(&format!("products/{id}"))
            .await
            .map_err(|e| e.or_not_found("product", id))
    }

    pub async fn create_product(&self, body: &ProductCreate) -> Result<ProductDto> {
        self.post("products", body).await
    }

    pub async fn update_product(&self, id: &str, body: &ProductUpdate) -> Result<()> {
        self.patch_no_response(&format!("products/{id}"), body)
            .await
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.delete(&format!("products/{id}")).await
    }

    /// Persist the full product order in one call.
    pub async fn reorder_products(&self, order: &[(String, u32)]) -> Result<()> {
        let body = ProductReorderBody {
            products: order
                .iter()
                .map(|(id, order_index)| ProductOrderEntry {
                    id: id.clone(),
                    order_index: *order_index,
                })
                .collect(),
        };
        self.put_no_response("products/reorder", &body).await
    }

    pub async fn product_variants(&self, product_id: &str) -> Result<Vec<VariantDto>> {
        self.get(&format!("products/{product_id}/variants")).await
    }

    pub async fn remove_variant(&self, variant_id: &str) -> Result<()> {
        self.delete(&format!("products/remove-variant/{variant_id}"))
            .await
    }
}

/// Build the multipart form for category create/update. `parentId` is only
/// appended when present; the image part carries filename and MIME type.
fn category_form(upload: &CategoryUpload) -> Result<Form> {
    let mut form = Form::new()
        .text("name", upload.name.clone())
        .text("description", upload.description.clone())
        .text("index", upload.index.to_string());

    if let Some(parent_id) = &upload.parent_id {
        form = form.text("parentId", parent_id.clone());
    }
    if let Some(image) = &upload.image {
        form = form.part("image", media_part(image)?);
    }
    Ok(form)
}

pub(crate) fn media_part(payload: &MediaPayload) -> Result<Part> {
    Ok(Part::bytes(payload.bytes.to_vec())
        .file_name(payload.file_name.clone())
        .mime_str(&payload.content_type)?)
}
