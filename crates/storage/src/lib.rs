#![forbid(unsafe_code)]

pub mod directory;
pub mod repository;
pub mod sample;

pub use directory::DirectoryCatalog;
pub use repository::{CatalogProvider, InMemoryCatalog, ProviderError, Storage};
