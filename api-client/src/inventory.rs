use serde_json::json;
use shared::{
    ApiError, InventoryItem, InventoryQuery, MovementQuery, NewStockMovement, Paginated, Product,
    StockMovement,
};

use crate::http::{Envelope, HttpClient};

/// REST client for `/inventory` and `/stock-movements`.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: HttpClient,
}

impl InventoryClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &InventoryQuery) -> Result<Paginated<InventoryItem>, ApiError> {
        self.http.get("/inventory", &query.to_params()).await
    }

    pub async fn for_product(&self, product_id: i64) -> Result<InventoryItem, ApiError> {
        let envelope: Envelope<InventoryItem> = self
            .http
            .get(&format!("/inventory/product/{product_id}"), &[])
            .await?;
        Ok(envelope.data)
    }

    pub async fn update(&self, product_id: i64, quantity: u32) -> Result<InventoryItem, ApiError> {
        let envelope: Envelope<InventoryItem> = self
            .http
            .put(
                &format!("/inventory/product/{product_id}"),
                &json!({ "quantity": quantity }),
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, ApiError> {
        let envelope: Envelope<Vec<Product>> = self
            .http
            .get("/inventory/low-stock", &[("threshold", threshold.to_string())])
            .await?;
        Ok(envelope.data)
    }

    pub async fn movements(
        &self,
        query: &MovementQuery,
    ) -> Result<Paginated<StockMovement>, ApiError> {
        self.http.get("/stock-movements", &query.to_params()).await
    }

    pub async fn add_movement(
        &self,
        movement: &NewStockMovement,
    ) -> Result<StockMovement, ApiError> {
        let envelope: Envelope<StockMovement> =
            self.http.post("/stock-movements", movement).await?;
        Ok(envelope.data)
    }
}
