pub mod backend;
pub mod http;
pub mod inventory;
pub mod mock;
pub mod products;
pub mod units;

pub use backend::{connect, Backend, BackendMode, MockBackend, RemoteBackend};
pub use http::HttpClient;
pub use mock::MockDataService;
