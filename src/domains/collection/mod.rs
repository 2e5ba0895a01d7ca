//! Postman collection generation.
//!
//! Produces a ready-to-import collection exercising discovery and every
//! registered tool against a running server.

mod generator;
pub mod postman;

pub use generator::{CollectionOptions, DEFAULT_OUTPUT, generate_collection, write_collection};
pub use postman::PostmanCollection;
