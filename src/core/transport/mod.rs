//! Transport layer for the tools server.
//!
//! The server speaks plain HTTP with JSON bodies:
//! - `GET /discovery` lists registered tools and their parameter schemas
//! - `POST /tools/{name}` invokes a tool
//!
//! The transport only translates between HTTP and the [`ToolServer`]; all
//! validation and dispatch happen in the tools domain.
//!
//! [`ToolServer`]: crate::core::ToolServer

mod config;
mod error;
pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
