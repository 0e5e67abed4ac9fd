//! HTTP API handlers for citelink-api

pub mod data;
pub mod health;

pub use data::{data_routes, get_data};
pub use health::health_routes;
