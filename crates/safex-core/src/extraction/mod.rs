//! Extraction run: the entry loop, materialization and fault recovery.

mod apply;
pub mod engine;
pub mod recovery;

pub use engine::ExtractionEngine;
pub use recovery::ErrorHandlerChoice;
