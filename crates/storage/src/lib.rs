pub mod database;
pub mod dto;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;

pub use database::Database;
pub use memory::InMemoryCatalogStore;
pub use repository::{CatalogRepository, CatalogStore};
