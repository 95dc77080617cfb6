// Paper corpus: the in-memory table, CSV ingestion and per-year counts.

pub mod loader;
pub mod paper;
pub mod summary;
