use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{MovementType, StockStatus};

/// Filters for `GET /products`. Absent fields are omitted from the query
/// string entirely rather than sent empty.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub unit_id: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(unit_id) = self.unit_id {
            params.push(("unit_id", unit_id.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    StockAsc,
    StockDesc,
    UpdatedDesc,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "stock_asc" => Some(Self::StockAsc),
            "stock_desc" => Some(Self::StockDesc),
            "updated_desc" => Some(Self::UpdatedDesc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::StockAsc => "stock_asc",
            Self::StockDesc => "stock_desc",
            Self::UpdatedDesc => "updated_desc",
        }
    }
}

/// Filters for `GET /inventory`.
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub search: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub category: Option<String>,
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl InventoryQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(status) = self.stock_status {
            let value = match status {
                StockStatus::InStock => "in_stock",
                StockStatus::LowStock => "low_stock",
                StockStatus::OutOfStock => "out_of_stock",
            };
            params.push(("stock_status", value.to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(sort) = self.sort {
            params.push(("sort", sort.as_str().to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Filters for `GET /stock-movements`. The date range is inclusive on both
/// ends; `date_to` covers up to the end of that calendar day.
#[derive(Debug, Clone, Default)]
pub struct MovementQuery {
    pub search: Option<String>,
    pub movement_type: Option<MovementType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub product_id: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl MovementQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(movement_type) = self.movement_type {
            params.push(("type", movement_type.as_str().to_string()));
        }
        if let Some(date_from) = self.date_from {
            params.push(("date_from", date_from.format("%Y-%m-%d").to_string()));
        }
        if let Some(date_to) = self.date_to {
            params.push(("date_to", date_to.format("%Y-%m-%d").to_string()));
        }
        if let Some(product_id) = self.product_id {
            params.push(("product_id", product_id.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}
