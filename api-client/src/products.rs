use serde_json::json;
use shared::{ApiError, NewProduct, Paginated, Product, ProductPatch, ProductQuery, StockLevel};

use crate::http::{Envelope, HttpClient};

/// REST client for the `/products` resource. Pure parameter shaping; all
/// behaviour lives server-side.
#[derive(Debug, Clone)]
pub struct ProductsClient {
    http: HttpClient,
}

impl ProductsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Paginated<Product>, ApiError> {
        self.http.get("/products", &query.to_params()).await
    }

    pub async fn get(&self, id: i64) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> =
            self.http.get(&format!("/products/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create(&self, draft: &NewProduct) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> = self.http.post("/products", draft).await?;
        Ok(envelope.data)
    }

    pub async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> =
            self.http.put(&format!("/products/{id}"), patch).await?;
        Ok(envelope.data)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/products/{id}")).await
    }

    pub async fn search(
        &self,
        term: &str,
        query: &ProductQuery,
    ) -> Result<Paginated<Product>, ApiError> {
        let mut params = query.to_params();
        params.retain(|(key, _)| *key != "search");
        params.insert(0, ("search", term.to_string()));
        self.http.get("/products/search", &params).await
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let envelope: Envelope<Vec<Product>> = self
            .http
            .get(&format!("/products/category/{category}"), &[])
            .await?;
        Ok(envelope.data)
    }

    pub async fn stock(&self, id: i64) -> Result<StockLevel, ApiError> {
        let envelope: Envelope<StockLevel> =
            self.http.get(&format!("/products/{id}/stock"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn update_stock(&self, id: i64, quantity: u32) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> = self
            .http
            .patch(
                &format!("/products/{id}/stock"),
                &json!({ "stock_quantity": quantity }),
            )
            .await?;
        Ok(envelope.data)
    }
}
