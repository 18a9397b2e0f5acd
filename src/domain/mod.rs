pub mod media_object;
pub mod pricing;
pub mod product;
pub mod taxonomy;
