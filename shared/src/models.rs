use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub barcode: Option<String>,
    pub category: String,
    pub unit_id: Option<i64>,
    pub unit_name: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Derived per-product stock row. Not persisted on its own; built from the
/// product list on every inventory query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_name: Option<String>,
    pub branch_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            product_id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            quantity: product.stock_quantity,
            unit_name: product.unit_name.clone(),
            branch_id: 1,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Append-only record of one stock change. Movements are never mutated or
/// deleted after they are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    pub previous_quantity: u32,
    pub new_quantity: u32,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
}

impl MovementType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Adjustment => "adjustment",
        }
    }

    /// Stored quantities are unsigned magnitudes; the type decides how a
    /// movement applies to the previous stock level.
    pub fn apply(&self, previous: u32, quantity: u32) -> u32 {
        match self {
            Self::In => previous + quantity,
            Self::Out => previous.saturating_sub(quantity),
            Self::Adjustment => quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn for_quantity(quantity: u32) -> Self {
        match quantity {
            0 => Self::OutOfStock,
            1..=5 => Self::LowStock,
            _ => Self::InStock,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_stock" => Some(Self::InStock),
            "low_stock" => Some(Self::LowStock),
            "out_of_stock" => Some(Self::OutOfStock),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

/// Payload for `POST /products`. Stock always starts at zero; the backend
/// assigns id, timestamps and the denormalized unit name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub barcode: Option<String>,
    pub category: String,
    pub unit_id: Option<i64>,
    pub description: Option<String>,
}

/// Partial update for `PUT /products/{id}`. Absent fields keep their current
/// value; `unit_name` is re-resolved only when `unit_id` is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `GET /products/{id}/stock` and `PATCH /products/{id}/stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: i64,
    pub stock_quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnit {
    pub name: String,
    pub description: Option<String>,
}

/// Payload for `POST /stock-movements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStockMovement {
    pub product_id: i64,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_in_adds() {
        assert_eq!(MovementType::In.apply(0, 10), 10);
        assert_eq!(MovementType::In.apply(25, 15), 40);
    }

    #[test]
    fn movement_out_floors_at_zero() {
        assert_eq!(MovementType::Out.apply(160, 10), 150);
        assert_eq!(MovementType::Out.apply(5, 5), 0);
        assert_eq!(MovementType::Out.apply(3, 10), 0);
    }

    #[test]
    fn movement_adjustment_overrides() {
        assert_eq!(MovementType::Adjustment.apply(10, 2), 2);
        assert_eq!(MovementType::Adjustment.apply(0, 7), 7);
    }

    #[test]
    fn stock_status_boundaries() {
        assert_eq!(StockStatus::for_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_quantity(1), StockStatus::LowStock);
        assert_eq!(StockStatus::for_quantity(5), StockStatus::LowStock);
        assert_eq!(StockStatus::for_quantity(6), StockStatus::InStock);
    }

    #[test]
    fn movement_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&MovementType::Adjustment).unwrap(),
            "\"adjustment\""
        );
        assert_eq!(MovementType::parse("out"), Some(MovementType::Out));
        assert_eq!(MovementType::parse("transfer"), None);
    }
}
