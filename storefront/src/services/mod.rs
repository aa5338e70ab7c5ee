// storefront/src/services/mod.rs

//! Business operations. Each service receives the document store it works on.

pub mod order_service;
pub mod product_service;
pub mod stats_service;
pub mod stock;

pub use order_service::OrderService;
pub use product_service::ProductService;
pub use stats_service::StatsService;
pub use stock::{SequentialDecrement, StockAdjuster};
