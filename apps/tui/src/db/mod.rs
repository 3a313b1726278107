pub mod migrations;
pub mod queries;
pub use migrations::create_database_pool;
pub use queries::{load_filters, save_filters};
