//! CSV in and out: the bulk stock-movement upload format and the report
//! exports. Parsing splits on commas and newlines without quote handling,
//! which matches the templates this module itself produces; only the two
//! free-text export columns are quoted, and those files are never read back.

use shared::{InventoryItem, Product, StockStatus};

use crate::format::{format_date, DateStyle};

pub const BULK_HEADERS: [&str; 4] = ["product_id", "type", "quantity", "reference"];

/// One line of a bulk upload, still unvalidated. Validation happens against
/// the live product list at preview time, not at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkRow {
    pub product_id: String,
    pub movement_type: String,
    pub quantity: String,
    pub reference: String,
}

pub fn bulk_template() -> String {
    "product_id,type,quantity,reference\n\
     1,in,10,Purchase Order #123\n\
     2,out,5,Sale #456\n\
     3,adjustment,15,Inventory Count"
        .to_string()
}

/// Columns may appear in any order; extra columns are ignored and short rows
/// fill in empty strings.
pub fn parse_bulk_csv(text: &str) -> Result<Vec<BulkRow>, String> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err("File must contain at least a header and one data row".to_string());
    }

    let headers: Vec<&str> = lines[0].split(',').map(str::trim).collect();
    if !BULK_HEADERS.iter().all(|h| headers.contains(h)) {
        return Err(
            "File must contain columns: product_id, type, quantity, reference".to_string(),
        );
    }

    let column = |name: &str| headers.iter().position(|h| *h == name);
    let product_id = column("product_id");
    let movement_type = column("type");
    let quantity = column("quantity");
    let reference = column("reference");

    let rows = lines[1..]
        .iter()
        .map(|line| {
            let values: Vec<&str> = line.split(',').map(str::trim).collect();
            let field = |idx: Option<usize>| {
                idx.and_then(|i| values.get(i))
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            };
            BulkRow {
                product_id: field(product_id),
                movement_type: field(movement_type),
                quantity: field(quantity),
                reference: field(reference),
            }
        })
        .collect();

    Ok(rows)
}

pub fn render_bulk_csv(rows: &[BulkRow]) -> String {
    let mut lines = vec![BULK_HEADERS.join(",")];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{},{},{},{}",
            row.product_id, row.movement_type, row.quantity, row.reference
        )
    }));
    lines.join("\n")
}

pub fn products_csv(products: &[Product]) -> String {
    let headers = [
        "ID",
        "Name",
        "Barcode",
        "Category",
        "Unit",
        "Description",
        "Stock Quantity",
        "Created At",
        "Updated At",
    ];
    let mut lines = vec![headers.join(",")];
    lines.extend(products.iter().map(|p| {
        format!(
            "{},\"{}\",{},{},{},\"{}\",{},{},{}",
            p.id,
            p.name,
            p.barcode.as_deref().unwrap_or(""),
            p.category,
            p.unit_name.as_deref().unwrap_or(""),
            p.description.as_deref().unwrap_or(""),
            p.stock_quantity,
            format_date(p.created_at, DateStyle::YmdHm),
            format_date(p.updated_at, DateStyle::YmdHm),
        )
    }));
    lines.join("\n")
}

pub fn inventory_csv(items: &[InventoryItem]) -> String {
    let headers = [
        "Product ID",
        "Product Name",
        "Category",
        "Current Stock",
        "Unit",
        "Status",
        "Last Updated",
    ];
    let mut lines = vec![headers.join(",")];
    lines.extend(items.iter().map(|item| {
        format!(
            "{},\"{}\",{},{},{},{},{}",
            item.product_id,
            item.name,
            item.category,
            item.quantity,
            item.unit_name.as_deref().unwrap_or(""),
            StockStatus::for_quantity(item.quantity).label(),
            format_date(item.updated_at, DateStyle::YmdHm),
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_template() {
        let rows = parse_bulk_csv(&bulk_template()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].product_id, "1");
        assert_eq!(rows[0].movement_type, "in");
        assert_eq!(rows[0].quantity, "10");
        assert_eq!(rows[0].reference, "Purchase Order #123");
        assert_eq!(rows[2].movement_type, "adjustment");
    }

    #[test]
    fn rejects_header_only_and_missing_columns() {
        assert_eq!(
            parse_bulk_csv("product_id,type,quantity,reference\n").unwrap_err(),
            "File must contain at least a header and one data row"
        );
        assert_eq!(
            parse_bulk_csv("product_id,type,amount\n1,in,10").unwrap_err(),
            "File must contain columns: product_id, type, quantity, reference"
        );
    }

    #[test]
    fn columns_may_be_reordered_and_short_rows_pad() {
        let rows =
            parse_bulk_csv("reference,quantity,type,product_id\nRestock,4,in,2\nSale,3,out")
                .unwrap();
        assert_eq!(rows[0].product_id, "2");
        assert_eq!(rows[0].reference, "Restock");
        assert_eq!(rows[1].product_id, "");
        assert_eq!(rows[1].movement_type, "out");
    }

    #[test]
    fn bulk_round_trip_without_commas() {
        let rows = vec![
            BulkRow {
                product_id: "1".into(),
                movement_type: "in".into(),
                quantity: "10".into(),
                reference: "PO #9".into(),
            },
            BulkRow {
                product_id: "5".into(),
                movement_type: "adjustment".into(),
                quantity: "0".into(),
                reference: "Recount".into(),
            },
        ];
        let text = render_bulk_csv(&rows);
        assert_eq!(parse_bulk_csv(&text).unwrap(), rows);
    }

    #[test]
    fn inventory_export_shape() {
        let item = InventoryItem {
            id: 3,
            product_id: 3,
            name: "Caesar Salad".into(),
            category: "Food".into(),
            quantity: 3,
            unit_name: Some("Plate".into()),
            branch_id: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let text = inventory_csv(&[item]);
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Product ID,Product Name,Category,Current Stock,Unit,Status,Last Updated"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("3,\"Caesar Salad\",Food,3,Plate,Low Stock,"));
    }
}
