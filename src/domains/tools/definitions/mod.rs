//! Tool definitions module.
//!
//! This module exports all built-in tool definitions, grouped by the
//! upstream service they wrap.

pub mod bring;

pub use bring::AddressDetailsTool;
