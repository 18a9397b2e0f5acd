use catalog_api::schema::{media_objects, products, taxonomies};
use diesel::prelude::*;

mod common;

#[test]
fn migrations_create_empty_catalog_tables() {
    let base = "test_migrations_create_empty_catalog_tables.db";

    {
        let test_db = common::TestDb::new(base);
        let mut conn = test_db.pool().get().expect("connection");

        let counts: (i64, i64, i64) = (
            products::table.count().get_result(&mut conn).expect("products"),
            taxonomies::table
                .count()
                .get_result(&mut conn)
                .expect("taxonomies"),
            media_objects::table
                .count()
                .get_result(&mut conn)
                .expect("media objects"),
        );
        assert_eq!(counts, (0, 0, 0));
    }

    for suffix in ["", "-shm", "-wal"] {
        assert!(!std::path::Path::new(&format!("{base}{suffix}")).exists());
    }
}
