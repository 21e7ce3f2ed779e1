//! Order and subscription-plan endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{OrderDto, OrderUpdate, PlanDto, PlanPayload};

impl ApiClient {
    // ── Orders ───────────────────────────────────────────────────────

    pub async fn list_orders(&self, take: usize, skip: usize) -> Result<Vec<OrderDto>> {
        self.get_with_params(
            "orders",
            &[("take", take.to_string()), ("skip", skip.to_string())],
        )
        .await
    }

    pub async fn get_order(&self, id: &str) -> Result<OrderDto> {
        self.get(&format!("orders/{id}"))
            .await
            .map_err(|e| e.or_not_found("order", id))
    }

    pub async fn update_order(&self, id: &str, body: &OrderUpdate) -> Result<()> {
        self.patch_no_response(&format!("orders/{id}"), body).await
    }

    /// Purchase history for one customer.
    pub async fn user_orders(&self, user_id: &str) -> Result<Vec<OrderDto>> {
        self.get(&format!("orders/user/{user_id}")).await
    }

    // ── Subscription plans ───────────────────────────────────────────

    pub async fn list_plans(&self) -> Result<Vec<PlanDto>> {
        self.get("subscriptions").await
    }

    pub async fn create_plan(&self, body: &PlanPayload) -> Result<PlanDto> {
        self.post("subscriptions", body).await
    }

    pub async fn update_plan(&self, id: &str, body: &PlanPayload) -> Result<()> {
        self.patch_no_response(&format!("subscriptions/{id}"), body)
            .await
    }

    pub async fn delete_plan(&self, id: &str) -> Result<()> {
        self.delete(&format!("subscriptions/{id}")).await
    }
}
