//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: tool definitions, validation and dispatch
//! - **collection**: Postman collection generation for the exposed tools

pub mod collection;
pub mod tools;
