//! Bring API tools module.
//!
//! Tools backed by the Bring (Posten/Bring) public APIs:
//! - `address`: address suggestions for a free-text query

pub mod address;
pub mod common;

pub use address::AddressDetailsTool;
