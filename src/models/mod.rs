pub mod media_object;
pub mod product;
pub mod taxonomy;

/// Lowercased copy of `value` kept next to searchable text columns.
///
/// SQLite folds case for ASCII only, so substring filters match against this
/// column instead of the original text.
pub fn search_key(value: &str) -> String {
    value.to_lowercase()
}
