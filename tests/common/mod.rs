//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rust_decimal::Decimal;

use catalog_api::domain::product::{NewProduct, Product};
use catalog_api::domain::taxonomy::{NewTaxonomy, Taxonomy};
use catalog_api::repository::{DieselRepository, ProductWriter, TaxonomyWriter};
use pushkind_common::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

pub fn seed_taxonomy(repo: &DieselRepository, name: &str) -> Taxonomy {
    repo.create_taxonomy(&NewTaxonomy::new(name))
        .expect("create taxonomy")
}

pub fn seed_product(
    repo: &DieselRepository,
    name: &str,
    description: &str,
    price: &str,
    taxonomy_id: i32,
) -> Product {
    repo.create_product(&NewProduct::new(name, description, dec(price), taxonomy_id))
        .expect("create product")
}
