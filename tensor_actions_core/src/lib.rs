// Tensor Actions Core Library
// Marketplace, chain, and action-building logic shared by the HTTP server

pub mod actions;
pub mod directory;
pub mod error;
pub mod fees;
pub mod format;
pub mod icon;
pub mod marketplace;
pub mod models;
pub mod native;
pub mod rpc_client;
pub mod settings;
pub mod tx;

// Re-exports
pub use error::CoreError;
pub use marketplace::*;
pub use models::*;
pub use rpc_client::*;
pub use settings::Settings;
