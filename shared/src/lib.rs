pub mod error;
pub mod models;
pub mod pagination;
pub mod query;

pub use error::ApiError;
pub use models::*;
pub use pagination::{Paginated, Pagination};
pub use query::{InventoryQuery, MovementQuery, ProductQuery, SortKey};
