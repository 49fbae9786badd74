//! Product list page: search, category/unit filters, the add/edit modal and
//! CSV export. State lives here; rendering produces plain strings from it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::{NewProduct, Pagination, Product, ProductPatch, ProductQuery, StockStatus, Unit};
use tracing::debug;

use crate::context::AppContext;
use crate::csv;
use crate::format::{capitalize, highlight, truncate};
use crate::notify::error_message;
use crate::rate::Debouncer;
use crate::validate;

const SEARCH_QUIET: Duration = Duration::from_millis(300);
const FILTERS_KEY: &str = "products.filters";
const DESCRIPTION_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub unit_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub barcode: String,
    pub category: String,
    pub unit_id: String,
    pub description: String,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            barcode: product.barcode.clone().unwrap_or_default(),
            category: product.category.clone(),
            unit_id: product.unit_id.map(|id| id.to_string()).unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    Edit(i64),
}

#[derive(Debug, Clone)]
pub enum ProductModal {
    Closed,
    Open {
        mode: ModalMode,
        form: ProductForm,
        errors: Vec<FieldError>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductStats {
    pub total: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub categories: usize,
}

pub struct ProductsPage {
    ctx: Arc<AppContext>,
    pub page: u32,
    pub limit: u32,
    pub filters: ProductFilters,
    pub products: Vec<Product>,
    pub units: Vec<Unit>,
    pub pagination: Option<Pagination>,
    pub modal: ProductModal,
    search_debounce: Debouncer,
    pending_search: String,
}

impl ProductsPage {
    /// Filters survive page reloads through local storage; everything else
    /// starts fresh.
    pub fn new(ctx: Arc<AppContext>, limit: u32) -> Self {
        let filters = ctx.storage.get(FILTERS_KEY, ProductFilters::default());
        let pending_search = filters.search.clone().unwrap_or_default();
        Self {
            ctx,
            page: 1,
            limit,
            filters,
            products: Vec::new(),
            units: Vec::new(),
            pagination: None,
            modal: ProductModal::Closed,
            search_debounce: Debouncer::new(SEARCH_QUIET),
            pending_search,
        }
    }

    pub async fn load_initial(&mut self) {
        self.ctx.loading.show();
        self.load_units().await;
        self.load_products().await;
        self.ctx.loading.hide();
    }

    pub async fn load_units(&mut self) {
        match self.ctx.backend.get_units().await {
            Ok(units) => self.units = units,
            Err(err) => {
                debug!(error = %err, "unit load failed");
                self.ctx.notifier.error("Failed to load units");
            }
        }
    }

    pub async fn load_products(&mut self) {
        let query = ProductQuery {
            search: self.filters.search.clone(),
            category: self.filters.category.clone(),
            unit_id: self.filters.unit_id,
            page: Some(self.page),
            limit: Some(self.limit),
        };
        match self.ctx.backend.get_products(&query).await {
            Ok(result) => {
                self.products = result.data;
                self.pagination = Some(result.pagination);
            }
            Err(err) => {
                self.ctx.notifier.error(error_message(&err));
                self.products.clear();
                self.pagination = None;
            }
        }
    }

    fn persist_filters(&self) {
        self.ctx.storage.set(FILTERS_KEY, &self.filters);
    }

    /// Records a keystroke; the reload waits for the quiet period.
    pub fn set_search_input(&mut self, term: &str) {
        self.pending_search = term.trim().to_string();
        self.search_debounce.trigger();
    }

    /// Applies the pending search once typing has settled. Returns whether a
    /// reload happened.
    pub async fn flush_search(&mut self) -> bool {
        if !self.search_debounce.ready() {
            return false;
        }
        self.filters.search = (!self.pending_search.is_empty()).then(|| self.pending_search.clone());
        self.page = 1;
        self.persist_filters();
        self.load_products().await;
        true
    }

    pub async fn set_category_filter(&mut self, category: Option<String>) {
        self.filters.category = category.filter(|c| !c.is_empty());
        self.page = 1;
        self.persist_filters();
        self.load_products().await;
    }

    pub async fn set_unit_filter(&mut self, unit_id: Option<i64>) {
        self.filters.unit_id = unit_id;
        self.page = 1;
        self.persist_filters();
        self.load_products().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        self.page = page;
        self.load_products().await;
    }

    pub fn open_add_modal(&mut self) {
        self.modal = ProductModal::Open {
            mode: ModalMode::Add,
            form: ProductForm::default(),
            errors: Vec::new(),
        };
    }

    /// Re-fetches the product so the form reflects the server copy, not the
    /// possibly stale table row.
    pub async fn open_edit_modal(&mut self, id: i64) {
        self.ctx.loading.show();
        match self.ctx.backend.get_product(id).await {
            Ok(product) => {
                self.modal = ProductModal::Open {
                    mode: ModalMode::Edit(product.id),
                    form: ProductForm::from_product(&product),
                    errors: Vec::new(),
                };
            }
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
        self.ctx.loading.hide();
    }

    pub fn close_modal(&mut self) {
        self.modal = ProductModal::Closed;
    }

    pub fn set_form(&mut self, form: ProductForm) {
        if let ProductModal::Open {
            form: current,
            errors,
            ..
        } = &mut self.modal
        {
            *current = form;
            errors.clear();
        }
    }

    fn validate_form(form: &ProductForm) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let required = [
            ("name", &form.name, "Product Name"),
            ("category", &form.category, "Category"),
            ("unit_id", &form.unit_id, "Unit"),
        ];
        for (field, value, label) in required {
            if let Some(message) = validate::required(value, label) {
                errors.push(FieldError { field, message });
            }
        }
        if !form.name.is_empty() {
            if let Some(message) = validate::min_length(&form.name, 2, "Product Name") {
                errors.push(FieldError {
                    field: "name",
                    message,
                });
            }
        }
        errors
    }

    /// Creates or updates depending on the open modal's mode. The form always
    /// carries every field, so the update patch sets them all; empty optional
    /// fields clear the stored value.
    pub async fn submit_form(&mut self) {
        let ProductModal::Open { mode, form, errors } = &mut self.modal else {
            return;
        };
        let found = Self::validate_form(form);
        if !found.is_empty() {
            *errors = found;
            return;
        }

        let mode = *mode;
        let name = form.name.trim().to_string();
        let barcode = Some(form.barcode.trim().to_string()).filter(|b| !b.is_empty());
        let category = form.category.trim().to_string();
        let unit_id = form.unit_id.trim().parse::<i64>().ok();
        let description = Some(form.description.trim().to_string()).filter(|d| !d.is_empty());

        self.ctx.loading.show();
        let outcome = match mode {
            ModalMode::Add => {
                let draft = NewProduct {
                    name,
                    barcode,
                    category,
                    unit_id,
                    description,
                };
                self.ctx
                    .backend
                    .create_product(&draft)
                    .await
                    .map(|_| "Product created successfully")
            }
            ModalMode::Edit(id) => {
                let patch = ProductPatch {
                    name: Some(name),
                    barcode: Some(barcode.unwrap_or_default()),
                    category: Some(category),
                    unit_id,
                    description: Some(description.unwrap_or_default()),
                };
                self.ctx
                    .backend
                    .update_product(id, &patch)
                    .await
                    .map(|_| "Product updated successfully")
            }
        };
        self.ctx.loading.hide();

        match outcome {
            Ok(message) => {
                self.ctx.notifier.success(message);
                self.close_modal();
                self.load_products().await;
            }
            // The modal stays open so the user can correct and resubmit.
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
    }

    pub async fn delete_product(&mut self, id: i64) {
        if !self.products.iter().any(|p| p.id == id) {
            self.ctx.notifier.error("Product not found");
            return;
        }
        self.ctx.loading.show();
        let result = self.ctx.backend.delete_product(id).await;
        self.ctx.loading.hide();
        match result {
            Ok(()) => {
                self.ctx.notifier.success("Product deleted successfully");
                self.load_products().await;
            }
            Err(err) => self.ctx.notifier.error(error_message(&err)),
        }
    }

    pub fn export_csv(&self) -> String {
        let text = csv::products_csv(&self.products);
        self.ctx.notifier.success("Products exported successfully");
        text
    }

    /// Counts over the loaded page only.
    pub fn stats(&self) -> ProductStats {
        let mut categories: Vec<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        ProductStats {
            total: self.products.len(),
            in_stock: self
                .products
                .iter()
                .filter(|p| p.stock_quantity > 0)
                .count(),
            low_stock: self
                .products
                .iter()
                .filter(|p| StockStatus::for_quantity(p.stock_quantity) == StockStatus::LowStock)
                .count(),
            out_of_stock: self
                .products
                .iter()
                .filter(|p| StockStatus::for_quantity(p.stock_quantity) == StockStatus::OutOfStock)
                .count(),
            categories: categories.len(),
        }
    }

    pub fn render_table(&self) -> String {
        if self.products.is_empty() {
            return "No products found\nTry adjusting your search or filters, or add a new product."
                .to_string();
        }
        let term = self.filters.search.as_deref().unwrap_or("");
        self.products
            .iter()
            .map(|p| {
                format!(
                    "{} | {} | {} | {} | {} | {} | {}",
                    p.id,
                    highlight(&p.name, term),
                    p.barcode.as_deref().unwrap_or("-"),
                    capitalize(&p.category),
                    p.unit_name.as_deref().unwrap_or("-"),
                    truncate(p.description.as_deref().unwrap_or("-"), DESCRIPTION_COLUMN_WIDTH),
                    Self::stock_cell(p.stock_quantity),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn stock_cell(quantity: u32) -> String {
        match StockStatus::for_quantity(quantity) {
            StockStatus::OutOfStock => "Out of Stock".to_string(),
            StockStatus::LowStock => format!("{quantity} Low"),
            StockStatus::InStock if quantity <= 20 => format!("{quantity} Medium"),
            StockStatus::InStock => format!("{quantity} In Stock"),
        }
    }

    pub fn render_pagination(&self) -> String {
        let Some(pagination) = &self.pagination else {
            return String::new();
        };
        if pagination.total == 0 {
            return "Showing 0-0 of 0 products".to_string();
        }
        let start = u64::from((pagination.page - 1) * self.limit) + 1;
        let end = u64::from(pagination.page * self.limit).min(pagination.total);
        format!(
            "Page {}/{} | Showing {}-{} of {} products",
            pagination.page, pagination.total_pages, start, end, pagination.total
        )
    }
}
