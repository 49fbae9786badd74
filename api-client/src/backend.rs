use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::{
    ApiError, InventoryItem, InventoryQuery, MovementQuery, NewProduct, NewStockMovement, NewUnit,
    Paginated, Product, ProductPatch, ProductQuery, StockLevel, StockMovement, Unit,
};
use tracing::info;

use crate::http::HttpClient;
use crate::inventory::InventoryClient;
use crate::mock::MockDataService;
use crate::products::ProductsClient;
use crate::units::UnitsClient;

/// One method per operation of the consumed REST surface. Implemented by the
/// remote client stack and by the in-memory mock, chosen once at construction
/// so every call site reads identically in either mode.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, ApiError>;
    async fn get_product(&self, id: i64) -> Result<Product, ApiError>;
    async fn create_product(&self, draft: &NewProduct) -> Result<Product, ApiError>;
    async fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<Product, ApiError>;
    async fn delete_product(&self, id: i64) -> Result<(), ApiError>;
    async fn search_products(
        &self,
        term: &str,
        query: &ProductQuery,
    ) -> Result<Paginated<Product>, ApiError>;
    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError>;
    async fn product_stock(&self, id: i64) -> Result<StockLevel, ApiError>;
    async fn update_product_stock(&self, id: i64, quantity: u32) -> Result<Product, ApiError>;

    async fn get_units(&self) -> Result<Vec<Unit>, ApiError>;
    async fn get_unit(&self, id: i64) -> Result<Unit, ApiError>;
    async fn create_unit(&self, draft: &NewUnit) -> Result<Unit, ApiError>;
    async fn update_unit(&self, id: i64, draft: &NewUnit) -> Result<Unit, ApiError>;
    async fn delete_unit(&self, id: i64) -> Result<(), ApiError>;

    async fn get_inventory(
        &self,
        query: &InventoryQuery,
    ) -> Result<Paginated<InventoryItem>, ApiError>;
    async fn product_inventory(&self, product_id: i64) -> Result<InventoryItem, ApiError>;
    async fn update_inventory(
        &self,
        product_id: i64,
        quantity: u32,
    ) -> Result<InventoryItem, ApiError>;
    async fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, ApiError>;

    async fn movements(&self, query: &MovementQuery)
        -> Result<Paginated<StockMovement>, ApiError>;
    async fn add_movement(&self, movement: &NewStockMovement)
        -> Result<StockMovement, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Mock,
    Remote,
}

/// Builds the configured backend. The mode is decided here, once; nothing
/// downstream ever checks it again.
pub fn connect(mode: BackendMode, base_url: &str, mock_delay: Duration) -> Arc<dyn Backend> {
    match mode {
        BackendMode::Mock => {
            info!(delay_ms = mock_delay.as_millis() as u64, "using in-memory mock backend");
            Arc::new(MockBackend::new(MockDataService::with_delay(mock_delay)))
        }
        BackendMode::Remote => {
            info!(base_url, "using remote backend");
            Arc::new(RemoteBackend::new(base_url))
        }
    }
}

/// Live REST backend: one shared HTTP client, three resource clients.
pub struct RemoteBackend {
    products: ProductsClient,
    units: UnitsClient,
    inventory: InventoryClient,
}

impl RemoteBackend {
    pub fn new(base_url: &str) -> Self {
        let http = HttpClient::new(base_url);
        Self {
            products: ProductsClient::new(http.clone()),
            units: UnitsClient::new(http.clone()),
            inventory: InventoryClient::new(http),
        }
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn get_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, ApiError> {
        self.products.list(query).await
    }

    async fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        self.products.get(id).await
    }

    async fn create_product(&self, draft: &NewProduct) -> Result<Product, ApiError> {
        self.products.create(draft).await
    }

    async fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<Product, ApiError> {
        self.products.update(id, patch).await
    }

    async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.products.delete(id).await
    }

    async fn search_products(
        &self,
        term: &str,
        query: &ProductQuery,
    ) -> Result<Paginated<Product>, ApiError> {
        self.products.search(term, query).await
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        self.products.by_category(category).await
    }

    async fn product_stock(&self, id: i64) -> Result<StockLevel, ApiError> {
        self.products.stock(id).await
    }

    async fn update_product_stock(&self, id: i64, quantity: u32) -> Result<Product, ApiError> {
        self.products.update_stock(id, quantity).await
    }

    async fn get_units(&self) -> Result<Vec<Unit>, ApiError> {
        self.units.list().await
    }

    async fn get_unit(&self, id: i64) -> Result<Unit, ApiError> {
        self.units.get(id).await
    }

    async fn create_unit(&self, draft: &NewUnit) -> Result<Unit, ApiError> {
        self.units.create(draft).await
    }

    async fn update_unit(&self, id: i64, draft: &NewUnit) -> Result<Unit, ApiError> {
        self.units.update(id, draft).await
    }

    async fn delete_unit(&self, id: i64) -> Result<(), ApiError> {
        self.units.delete(id).await
    }

    async fn get_inventory(
        &self,
        query: &InventoryQuery,
    ) -> Result<Paginated<InventoryItem>, ApiError> {
        self.inventory.list(query).await
    }

    async fn product_inventory(&self, product_id: i64) -> Result<InventoryItem, ApiError> {
        self.inventory.for_product(product_id).await
    }

    async fn update_inventory(
        &self,
        product_id: i64,
        quantity: u32,
    ) -> Result<InventoryItem, ApiError> {
        self.inventory.update(product_id, quantity).await
    }

    async fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, ApiError> {
        self.inventory.low_stock(threshold).await
    }

    async fn movements(
        &self,
        query: &MovementQuery,
    ) -> Result<Paginated<StockMovement>, ApiError> {
        self.inventory.movements(query).await
    }

    async fn add_movement(
        &self,
        movement: &NewStockMovement,
    ) -> Result<StockMovement, ApiError> {
        self.inventory.add_movement(movement).await
    }
}

/// Development backend over the in-memory mock service.
pub struct MockBackend {
    service: MockDataService,
}

impl MockBackend {
    pub fn new(service: MockDataService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, ApiError> {
        self.service.get_products(query).await
    }

    async fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        self.service.get_product(id).await
    }

    async fn create_product(&self, draft: &NewProduct) -> Result<Product, ApiError> {
        self.service.create_product(draft).await
    }

    async fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<Product, ApiError> {
        self.service.update_product(id, patch).await
    }

    async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.service.delete_product(id).await
    }

    async fn search_products(
        &self,
        term: &str,
        query: &ProductQuery,
    ) -> Result<Paginated<Product>, ApiError> {
        self.service.search_products(term, query).await
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        self.service.products_by_category(category).await
    }

    async fn product_stock(&self, id: i64) -> Result<StockLevel, ApiError> {
        self.service.product_stock(id).await
    }

    async fn update_product_stock(&self, id: i64, quantity: u32) -> Result<Product, ApiError> {
        self.service.update_product_stock(id, quantity).await
    }

    async fn get_units(&self) -> Result<Vec<Unit>, ApiError> {
        self.service.get_units().await
    }

    async fn get_unit(&self, id: i64) -> Result<Unit, ApiError> {
        self.service.get_unit(id).await
    }

    async fn create_unit(&self, draft: &NewUnit) -> Result<Unit, ApiError> {
        self.service.create_unit(draft).await
    }

    async fn update_unit(&self, id: i64, draft: &NewUnit) -> Result<Unit, ApiError> {
        self.service.update_unit(id, draft).await
    }

    async fn delete_unit(&self, id: i64) -> Result<(), ApiError> {
        self.service.delete_unit(id).await
    }

    async fn get_inventory(
        &self,
        query: &InventoryQuery,
    ) -> Result<Paginated<InventoryItem>, ApiError> {
        self.service.get_inventory(query).await
    }

    async fn product_inventory(&self, product_id: i64) -> Result<InventoryItem, ApiError> {
        self.service.product_inventory(product_id).await
    }

    async fn update_inventory(
        &self,
        product_id: i64,
        quantity: u32,
    ) -> Result<InventoryItem, ApiError> {
        self.service.update_inventory(product_id, quantity).await
    }

    async fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, ApiError> {
        self.service.low_stock(threshold).await
    }

    async fn movements(
        &self,
        query: &MovementQuery,
    ) -> Result<Paginated<StockMovement>, ApiError> {
        self.service.movements(query).await
    }

    async fn add_movement(
        &self,
        movement: &NewStockMovement,
    ) -> Result<StockMovement, ApiError> {
        self.service.add_movement(movement).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_mode_serves_seed_data_through_the_trait() {
        let backend = connect(BackendMode::Mock, "", Duration::ZERO);
        let units = backend.get_units().await.unwrap();
        assert_eq!(units.len(), 7);
        let products = backend.get_products(&ProductQuery::default()).await.unwrap();
        assert_eq!(products.pagination.total, 5);
    }
}
