//! 应用层

pub mod products;

pub use products::handler::AppState;
