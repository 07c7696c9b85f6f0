//! Dream Library
//!
//! A shared lending catalog: entries can be authored, checked out, read and
//! returned, with a checkout ledger per entry. The whole catalog is persisted
//! as one JSON snapshot in a string-valued key-value medium.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::LibraryStore;
