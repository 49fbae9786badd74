//! Inventory page: three tabs (stock levels, movement history, alerts), the
//! stock-movement modal, quick actions and the bulk CSV workflow.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use shared::{
    InventoryItem, InventoryQuery, MovementQuery, MovementType, NewStockMovement, Pagination,
    Product, ProductQuery, SortKey, StockMovement, StockStatus,
};
use tracing::debug;

use crate::context::AppContext;
use crate::csv::{self, BulkRow};
use crate::format::{capitalize, format_date, highlight, relative_time, DateStyle};
use crate::notify::error_message;
use crate::rate::Debouncer;
use crate::validate;

const SEARCH_QUIET: Duration = Duration::from_millis(300);
const PRODUCT_DROPDOWN_LIMIT: u32 = 1000;

pub const LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Inventory,
    Movements,
    Alerts,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryFilters {
    pub search: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub category: Option<String>,
    pub sort: Option<SortKey>,
}

#[derive(Debug, Clone, Default)]
pub struct MovementFilters {
    pub search: Option<String>,
    pub movement_type: Option<MovementType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub product_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMode {
    Add,
    Adjustment,
}

#[derive(Debug, Clone, Default)]
pub struct StockForm {
    pub product_id: String,
    pub movement_type: String,
    pub quantity: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum StockModal {
    Closed,
    Open {
        mode: StockMode,
        form: StockForm,
        errors: Vec<FieldError>,
    },
}

/// One parsed bulk row together with its preview verdict. Validity is judged
/// against the loaded product list before anything is sent.
#[derive(Debug, Clone)]
pub struct BulkPreviewRow {
    pub row: BulkRow,
    pub product_name: String,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub total: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

pub struct InventoryPage {
    ctx: Arc<AppContext>,
    pub tab: Tab,
    pub page: u32,
    pub movements_page: u32,
    pub limit: u32,
    pub filters: InventoryFilters,
    pub movement_filters: MovementFilters,
    pub items: Vec<InventoryItem>,
    pub pagination: Option<Pagination>,
    pub movements: Vec<StockMovement>,
    pub movements_pagination: Option<Pagination>,
    pub products: Vec<Product>,
    pub low_stock: Vec<Product>,
    pub out_of_stock: Vec<InventoryItem>,
    pub modal: StockModal,
    pub bulk_preview: Vec<BulkPreviewRow>,
    search_debounce: Debouncer,
    movements_search_debounce: Debouncer,
    pending_search: String,
    pending_movements_search: String,
}

impl InventoryPage {
    pub fn new(ctx: Arc<AppContext>, limit: u32) -> Self {
        Self {
            ctx,
            tab: Tab::Inventory,
            page: 1,
            movements_page: 1,
            limit,
            filters: InventoryFilters::default(),
            movement_filters: MovementFilters::default(),
            items: Vec::new(),
            pagination: None,
            movements: Vec::new(),
            movements_pagination: None,
            products: Vec::new(),
            low_stock: Vec::new(),
            out_of_stock: Vec::new(),
            modal: StockModal::Closed,
            bulk_preview: Vec::new(),
            search_debounce: Debouncer::new(SEARCH_QUIET),
            movements_search_debounce: Debouncer::new(SEARCH_QUIET),
            pending_search: String::new(),
            pending_movements_search: String::new(),
        }
    }

    pub async fn load_initial(&mut self) {
        self.ctx.loading.show();
        self.load_products().await;
        self.load_inventory().await;
        self.load_movements().await;
        self.load_alerts().await;
        self.ctx.loading.hide();
    }

    /// One oversized page; the modal dropdown and bulk validation want the
    /// whole catalogue.
    pub async fn load_products(&mut self) {
        let query = ProductQuery {
            limit: Some(PRODUCT_DROPDOWN_LIMIT),
            ..Default::default()
        };
        match self.ctx.backend.get_products(&query).await {
            Ok(result) => self.products = result.data,
            Err(err) => {
                debug!(error = %err, "product load failed");
                self.ctx.notifier.error("Failed to load products");
            }
        }
    }

    pub async fn load_inventory(&mut self) {
        let query = InventoryQuery {
            search: self.filters.search.clone(),
            stock_status: self.filters.stock_status,
            category: self.filters.category.clone(),
            sort: self.filters.sort,
            page: Some(self.page),
            limit: Some(self.limit),
        };
        match self.ctx.backend.get_inventory(&query).await {
            Ok(result) => {
                self.items = result.data;
                self.pagination = Some(result.pagination);
            }
            Err(err) => {
                self.ctx.notifier.error(error_message(&err));
                self.items.clear();
                self.pagination = None;
            }
        }
    }

    pub async fn load_movements(&mut self) {
        let query = self.movement_query();
        match self.ctx.backend.movements(&query).await {
            Ok(result) => {
                self.movements = result.data;
                self.movements_pagination = Some(result.pagination);
            }
            Err(err) => {
                self.ctx.notifier.error(error_message(&err));
                self.movements.clear();
                self.movements_pagination = None;
            }
        }
    }

    fn movement_query(&self) -> MovementQuery {
        MovementQuery {
            search: self.movement_filters.search.clone(),
            movement_type: self.movement_filters.movement_type,
            date_from: self.movement_filters.date_from,
            date_to: self.movement_filters.date_to,
            product_id: self.movement_filters.product_id,
            page: Some(self.movements_page),
            limit: Some(self.limit),
        }
    }

    /// Low-stock comes from the backend; out-of-stock is read off the loaded
    /// inventory page.
    pub async fn load_alerts(&mut self) {
        match self.ctx.backend.low_stock(LOW_STOCK_THRESHOLD).await {
            Ok(products) => self.low_stock = products,
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
        self.out_of_stock = self
            .items
            .iter()
            .filter(|item| item.quantity == 0)
            .cloned()
            .collect();
    }

    pub async fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        match tab {
            Tab::Inventory => self.load_inventory().await,
            Tab::Movements => self.load_movements().await,
            Tab::Alerts => self.load_alerts().await,
        }
    }

    // --- inventory filters ---

    pub fn set_search_input(&mut self, term: &str) {
        self.pending_search = term.trim().to_string();
        self.search_debounce.trigger();
    }

    pub async fn flush_search(&mut self) -> bool {
        if !self.search_debounce.ready() {
            return false;
        }
        self.filters.search = (!self.pending_search.is_empty()).then(|| self.pending_search.clone());
        self.page = 1;
        self.load_inventory().await;
        true
    }

    pub async fn set_stock_status_filter(&mut self, status: Option<StockStatus>) {
        self.filters.stock_status = status;
        self.page = 1;
        self.load_inventory().await;
    }

    pub async fn set_category_filter(&mut self, category: Option<String>) {
        self.filters.category = category.filter(|c| !c.is_empty());
        self.page = 1;
        self.load_inventory().await;
    }

    pub async fn set_sort(&mut self, sort: Option<SortKey>) {
        self.filters.sort = sort;
        self.page = 1;
        self.load_inventory().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        self.page = page;
        self.load_inventory().await;
    }

    // --- movement filters ---

    pub fn set_movements_search_input(&mut self, term: &str) {
        self.pending_movements_search = term.trim().to_string();
        self.movements_search_debounce.trigger();
    }

    pub async fn flush_movements_search(&mut self) -> bool {
        if !self.movements_search_debounce.ready() {
            return false;
        }
        self.movement_filters.search =
            (!self.pending_movements_search.is_empty()).then(|| self.pending_movements_search.clone());
        self.movements_page = 1;
        self.load_movements().await;
        true
    }

    pub async fn set_movement_type_filter(&mut self, movement_type: Option<MovementType>) {
        self.movement_filters.movement_type = movement_type;
        self.movements_page = 1;
        self.load_movements().await;
    }

    pub async fn set_date_filter(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.movement_filters.date_from = from;
        self.movement_filters.date_to = to;
        self.movements_page = 1;
        self.load_movements().await;
    }

    pub async fn go_to_movements_page(&mut self, page: u32) {
        self.movements_page = page;
        self.load_movements().await;
    }

    /// Jumps to the movements tab filtered down to one product.
    pub async fn view_movements(&mut self, product_id: i64) {
        self.tab = Tab::Movements;
        self.movement_filters.product_id = Some(product_id);
        self.movements_page = 1;
        self.load_movements().await;
        self.ctx
            .notifier
            .info(format!("Showing movements for product ID: {product_id}"));
    }

    // --- stock modal ---

    pub fn open_stock_modal(&mut self, mode: StockMode, product_id: Option<i64>) {
        let form = StockForm {
            product_id: product_id.map(|id| id.to_string()).unwrap_or_default(),
            movement_type: match mode {
                StockMode::Add => "in".to_string(),
                StockMode::Adjustment => String::new(),
            },
            ..Default::default()
        };
        self.modal = StockModal::Open {
            mode,
            form,
            errors: Vec::new(),
        };
    }

    pub fn close_stock_modal(&mut self) {
        self.modal = StockModal::Closed;
    }

    pub fn set_stock_form(&mut self, form: StockForm) {
        if let StockModal::Open {
            form: current,
            errors,
            ..
        } = &mut self.modal
        {
            *current = form;
            errors.clear();
        }
    }

    pub fn quick_stock_in(&mut self, product_id: i64) {
        self.open_stock_modal(StockMode::Add, Some(product_id));
    }

    pub fn edit_stock(&mut self, product_id: i64) {
        self.open_stock_modal(StockMode::Adjustment, Some(product_id));
    }

    /// Mirrors the helper text under the product dropdown.
    pub fn current_stock_display(&self) -> String {
        let StockModal::Open { form, .. } = &self.modal else {
            return String::new();
        };
        form.product_id
            .parse::<i64>()
            .ok()
            .and_then(|id| self.products.iter().find(|p| p.id == id))
            .map(|p| format!("{}: {} units", p.name, p.stock_quantity))
            .unwrap_or_else(|| "Select a product to see current stock".to_string())
    }

    fn validate_stock_form(form: &StockForm) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let required = [
            ("product_id", &form.product_id, "Product"),
            ("movement_type", &form.movement_type, "Movement Type"),
            ("quantity", &form.quantity, "Quantity"),
        ];
        for (field, value, label) in required {
            if let Some(message) = validate::required(value, label) {
                errors.push(FieldError { field, message });
            }
        }
        if !form.quantity.is_empty() {
            if let Some(message) = validate::positive_number(&form.quantity, "Quantity") {
                errors.push(FieldError {
                    field: "quantity",
                    message,
                });
            }
        }
        errors
    }

    pub async fn submit_stock(&mut self) {
        let StockModal::Open { form, errors, .. } = &mut self.modal else {
            return;
        };
        let found = Self::validate_stock_form(form);
        if !found.is_empty() {
            *errors = found;
            return;
        }

        let Some(movement_type) = MovementType::parse(&form.movement_type) else {
            *errors = vec![FieldError {
                field: "movement_type",
                message: "Movement Type is required".to_string(),
            }];
            return;
        };
        let Ok(product_id) = form.product_id.parse::<i64>() else {
            *errors = vec![FieldError {
                field: "product_id",
                message: "Product is required".to_string(),
            }];
            return;
        };
        // Validation accepts decimals; the API takes whole units, so the
        // fractional part is dropped.
        let quantity = form
            .quantity
            .trim()
            .parse::<f64>()
            .map(|q| q.trunc() as u32)
            .unwrap_or(0);
        let movement = NewStockMovement {
            product_id,
            movement_type,
            quantity,
            reference: Some(form.reference.trim().to_string()).filter(|r| !r.is_empty()),
        };

        self.ctx.loading.show();
        let result = self.ctx.backend.add_movement(&movement).await;
        self.ctx.loading.hide();
        match result {
            Ok(_) => {
                self.ctx.notifier.success("Stock updated successfully");
                self.close_stock_modal();
                self.refresh_all().await;
            }
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
    }

    // --- bulk upload ---

    pub fn preview_bulk(&mut self, text: &str) -> Result<(), String> {
        let rows = csv::parse_bulk_csv(text)?;
        self.bulk_preview = rows
            .into_iter()
            .map(|row| {
                let product = row
                    .product_id
                    .parse::<i64>()
                    .ok()
                    .and_then(|id| self.products.iter().find(|p| p.id == id));
                let valid = product.is_some()
                    && MovementType::parse(&row.movement_type).is_some()
                    && row.quantity.parse::<u32>().is_ok_and(|q| q > 0);
                let product_name = product
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("Unknown ({})", row.product_id));
                BulkPreviewRow {
                    row,
                    product_name,
                    valid,
                }
            })
            .collect();
        Ok(())
    }

    /// Applies valid preview rows one at a time; invalid rows and failed
    /// calls both count as errors in the summary toast.
    pub async fn process_bulk(&mut self) {
        if self.bulk_preview.is_empty() {
            self.ctx.notifier.error("No data to process");
            return;
        }

        self.ctx.loading.show();
        let rows = std::mem::take(&mut self.bulk_preview);
        let mut success_count = 0usize;
        let mut error_count = 0usize;
        for preview in &rows {
            if !preview.valid {
                error_count += 1;
                continue;
            }
            // Parses are safe after the validity check.
            let movement = NewStockMovement {
                product_id: preview.row.product_id.parse().unwrap_or_default(),
                movement_type: MovementType::parse(&preview.row.movement_type)
                    .unwrap_or(MovementType::Adjustment),
                quantity: preview.row.quantity.parse().unwrap_or_default(),
                reference: Some(if preview.row.reference.is_empty() {
                    "Bulk Update".to_string()
                } else {
                    preview.row.reference.clone()
                }),
            };
            match self.ctx.backend.add_movement(&movement).await {
                Ok(_) => success_count += 1,
                Err(err) => {
                    debug!(error = %err, product_id = movement.product_id, "bulk row failed");
                    error_count += 1;
                }
            }
        }
        self.ctx.loading.hide();

        self.ctx.notifier.success(format!(
            "Bulk update completed: {success_count} successful, {error_count} errors"
        ));
        self.refresh_all().await;
    }

    /// Reloads all four data sets concurrently against one snapshot of the
    /// filters, then rebuilds the derived alert list.
    pub async fn refresh_all(&mut self) {
        let product_query = ProductQuery {
            limit: Some(PRODUCT_DROPDOWN_LIMIT),
            ..Default::default()
        };
        let inventory_query = InventoryQuery {
            search: self.filters.search.clone(),
            stock_status: self.filters.stock_status,
            category: self.filters.category.clone(),
            sort: self.filters.sort,
            page: Some(self.page),
            limit: Some(self.limit),
        };
        let movement_query = self.movement_query();
        let backend = &self.ctx.backend;
        let (products, inventory, movements, low_stock) = futures::join!(
            backend.get_products(&product_query),
            backend.get_inventory(&inventory_query),
            backend.movements(&movement_query),
            backend.low_stock(LOW_STOCK_THRESHOLD),
        );

        match products {
            Ok(result) => self.products = result.data,
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
        match inventory {
            Ok(result) => {
                self.items = result.data;
                self.pagination = Some(result.pagination);
            }
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
        match movements {
            Ok(result) => {
                self.movements = result.data;
                self.movements_pagination = Some(result.pagination);
            }
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
        match low_stock {
            Ok(products) => self.low_stock = products,
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
        self.out_of_stock = self
            .items
            .iter()
            .filter(|item| item.quantity == 0)
            .cloned()
            .collect();
    }

    pub fn export_csv(&self) -> String {
        let text = csv::inventory_csv(&self.items);
        self.ctx.notifier.success("Inventory exported successfully");
        text
    }

    /// Counts over the loaded inventory page only.
    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            total: self.items.len(),
            in_stock: self.items.iter().filter(|i| i.quantity > 0).count(),
            low_stock: self
                .items
                .iter()
                .filter(|i| (1..=LOW_STOCK_THRESHOLD).contains(&i.quantity))
                .count(),
            out_of_stock: self.items.iter().filter(|i| i.quantity == 0).count(),
        }
    }

    // --- rendering ---

    pub fn render_inventory_table(&self) -> String {
        if self.items.is_empty() {
            return "No inventory data found\nTry adjusting your search or filters.".to_string();
        }
        let term = self.filters.search.as_deref().unwrap_or("");
        let now = Utc::now();
        self.items
            .iter()
            .map(|item| {
                format!(
                    "{} (ID: {}) | {} | {} | {} | {} | {}",
                    highlight(&item.name, term),
                    item.product_id,
                    capitalize(&item.category),
                    item.quantity,
                    item.unit_name.as_deref().unwrap_or("-"),
                    StockStatus::for_quantity(item.quantity).label(),
                    relative_time(item.updated_at, now),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_movements_table(&self) -> String {
        if self.movements.is_empty() {
            return "No stock movements found\nTry adjusting your search or filters.".to_string();
        }
        self.movements
            .iter()
            .map(|m| {
                let badge = match m.movement_type {
                    MovementType::In => "Stock In",
                    MovementType::Out => "Stock Out",
                    MovementType::Adjustment => "Adjustment",
                };
                let sign = if m.movement_type == MovementType::In {
                    '+'
                } else {
                    '-'
                };
                format!(
                    "{} | {} (ID: {}) | {} | {}{} | {} -> {} | {}",
                    format_date(m.created_at, DateStyle::DmyHm),
                    m.product_name,
                    m.product_id,
                    badge,
                    sign,
                    m.quantity,
                    m.previous_quantity,
                    m.new_quantity,
                    m.reference.as_deref().unwrap_or("-"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_alerts(&self) -> String {
        let mut out = String::new();
        if self.low_stock.is_empty() {
            out.push_str("No low stock alerts\nAll products have sufficient stock levels.\n");
        } else {
            for product in &self.low_stock {
                out.push_str(&format!(
                    "LOW: {} | Current Stock: {} {} (Below threshold)\n",
                    product.name,
                    product.stock_quantity,
                    product.unit_name.as_deref().unwrap_or(""),
                ));
            }
        }
        if self.out_of_stock.is_empty() {
            out.push_str("No out of stock alerts\nAll products are currently in stock.");
        } else {
            for item in &self.out_of_stock {
                out.push_str(&format!(
                    "OUT: {} | Current Stock: {} {} (Out of stock)\n",
                    item.name,
                    item.quantity,
                    item.unit_name.as_deref().unwrap_or(""),
                ));
            }
        }
        out
    }

    pub fn render_pagination(&self) -> String {
        Self::pagination_line(self.pagination.as_ref(), self.limit, "items")
    }

    pub fn render_movements_pagination(&self) -> String {
        Self::pagination_line(self.movements_pagination.as_ref(), self.limit, "movements")
    }

    fn pagination_line(pagination: Option<&Pagination>, limit: u32, noun: &str) -> String {
        let Some(pagination) = pagination else {
            return String::new();
        };
        if pagination.total == 0 {
            return format!("Showing 0-0 of 0 {noun}");
        }
        let start = u64::from((pagination.page - 1) * limit) + 1;
        let end = u64::from(pagination.page * limit).min(pagination.total);
        format!(
            "Page {}/{} | Showing {}-{} of {} {}",
            pagination.page, pagination.total_pages, start, end, pagination.total, noun
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use api_client::{connect, BackendMode};

    fn page() -> (InventoryPage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let backend = connect(BackendMode::Mock, "", Duration::ZERO);
        let ctx = Arc::new(AppContext::new(
            backend,
            Storage::new(dir.path().join("state.json")),
        ));
        (InventoryPage::new(ctx, 10), dir)
    }

    #[tokio::test]
    async fn initial_load_fills_every_tab() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        assert_eq!(page.products.len(), 5);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.movements.len(), 6);
        assert_eq!(page.low_stock.len(), 1);
        assert_eq!(page.low_stock[0].name, "Caesar Salad");
        assert_eq!(page.out_of_stock.len(), 1);
        assert_eq!(page.out_of_stock[0].name, "Orange Juice");
    }

    #[tokio::test]
    async fn movements_arrive_newest_first() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        assert_eq!(page.movements[0].reference.as_deref(), Some("Restock delivery"));
        let mut sorted = page.movements.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        assert_eq!(
            page.movements.iter().map(|m| m.id).collect::<Vec<_>>(),
            sorted.iter().map(|m| m.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn view_movements_filters_by_product() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.view_movements(1).await;
        assert_eq!(page.tab, Tab::Movements);
        assert_eq!(page.movements.len(), 2);
        assert!(page.movements.iter().all(|m| m.product_id == 1));
    }

    #[tokio::test]
    async fn stock_form_requires_type_and_positive_quantity() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.open_stock_modal(StockMode::Adjustment, Some(1));
        page.set_stock_form(StockForm {
            product_id: "1".into(),
            movement_type: String::new(),
            quantity: "-3".into(),
            reference: String::new(),
        });
        page.submit_stock().await;
        let StockModal::Open { errors, .. } = &page.modal else {
            panic!("modal should stay open");
        };
        assert!(errors
            .iter()
            .any(|e| e.message == "Movement Type is required"));
        assert!(errors
            .iter()
            .any(|e| e.message == "Quantity must be a positive number"));
    }

    #[tokio::test]
    async fn decimal_quantity_truncates_to_whole_units() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.edit_stock(2);
        page.set_stock_form(StockForm {
            product_id: "2".into(),
            movement_type: "adjustment".into(),
            quantity: "3.5".into(),
            reference: String::new(),
        });
        page.submit_stock().await;
        assert!(matches!(page.modal, StockModal::Closed));
        let cola = page.products.iter().find(|p| p.id == 2).unwrap();
        assert_eq!(cola.stock_quantity, 3);
    }

    #[tokio::test]
    async fn submit_stock_restocks_and_refreshes() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.quick_stock_in(5);
        assert!(page.current_stock_display().starts_with("Orange Juice: 0"));
        page.set_stock_form(StockForm {
            product_id: "5".into(),
            movement_type: "in".into(),
            quantity: "10".into(),
            reference: "Restock".into(),
        });
        page.submit_stock().await;
        assert!(matches!(page.modal, StockModal::Closed));
        let juice = page.products.iter().find(|p| p.id == 5).unwrap();
        assert_eq!(juice.stock_quantity, 10);
        assert!(page.out_of_stock.is_empty());
    }

    #[tokio::test]
    async fn bulk_preview_flags_bad_rows() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.preview_bulk(
            "product_id,type,quantity,reference\n1,in,10,PO #9\n99,in,5,Ghost\n2,sideways,5,Bad\n3,out,zero,Bad",
        )
        .unwrap();
        assert_eq!(page.bulk_preview.len(), 4);
        assert!(page.bulk_preview[0].valid);
        assert_eq!(page.bulk_preview[0].product_name, "Margherita Pizza");
        assert!(!page.bulk_preview[1].valid);
        assert_eq!(page.bulk_preview[1].product_name, "Unknown (99)");
        assert!(!page.bulk_preview[2].valid);
        assert!(!page.bulk_preview[3].valid);
    }

    #[tokio::test]
    async fn process_bulk_applies_valid_rows_only() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.preview_bulk("product_id,type,quantity,reference\n1,in,10,PO #9\n99,in,5,Ghost")
            .unwrap();
        page.process_bulk().await;
        assert!(page.bulk_preview.is_empty());
        let pizza = page.products.iter().find(|p| p.id == 1).unwrap();
        assert_eq!(pizza.stock_quantity, 35);
        let toast = page
            .ctx
            .notifier
            .snapshot()
            .into_iter()
            .map(|n| n.message)
            .find(|m| m.starts_with("Bulk update"))
            .unwrap();
        assert_eq!(toast, "Bulk update completed: 1 successful, 1 errors");
    }

    #[tokio::test]
    async fn process_bulk_without_a_preview_complains() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.process_bulk().await;
        assert_eq!(
            page.ctx.notifier.snapshot().last().unwrap().message,
            "No data to process"
        );
    }

    #[tokio::test]
    async fn sort_by_stock_ascending() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        page.set_sort(Some(SortKey::StockAsc)).await;
        let quantities: Vec<u32> = page.items.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![0, 2, 8, 25, 150]);
    }

    #[tokio::test]
    async fn stats_count_the_loaded_page() {
        let (mut page, _dir) = page();
        page.load_initial().await;
        assert_eq!(
            page.stats(),
            InventoryStats {
                total: 5,
                in_stock: 4,
                low_stock: 1,
                out_of_stock: 1,
            }
        );
    }
}
