//! Multi-source exoplanet classification engine.
//!
//! Pure engine crate: receives pre-loaded rows, returns classified results.
//! File loading helpers live in [`loader`]; no CLI dependencies.

pub mod config;
pub mod disposition;
pub mod engine;
pub mod error;
pub mod fields;
pub mod habitability;
pub mod hash;
pub mod loader;
pub mod model;
pub mod names;
pub mod schema;
pub mod summary;
pub mod value;

pub use config::ClassifyConfig;
pub use engine::{classify_batch, classify_row, run};
pub use error::ClassifyError;
pub use model::{BatchInput, BatchResult, Classification, ClassificationResult};
pub use value::{Row, Value};
