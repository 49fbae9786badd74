pub mod context;
pub mod csv;
pub mod format;
pub mod inventory_page;
pub mod notify;
pub mod products_page;
pub mod rate;
pub mod storage;
pub mod validate;
