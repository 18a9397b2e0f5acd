pub mod config;
pub mod domain;
pub mod forms;
pub mod hydra;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Page size of the products collection.
pub const PRODUCTS_PER_PAGE: usize = 5;

/// Page size of every other collection.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 30;
