//! Address Tools Server Library
//!
//! An HTTP host for discoverable tools. Each tool declares a name, a
//! description and typed parameters; the server lists them at `/discovery`
//! and runs them at `POST /tools/{name}` after validating the request body
//! against the declared parameters.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server facade and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool schema, parameter validation, registry and built-in tools
//!   - **collection**: Postman collection generation
//!
//! # Example
//!
//! ```rust,no_run
//! use address_tools_server::core::{Config, HttpTransport, ToolServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = ToolServer::with_builtin_tools(config.clone())?;
//!     HttpTransport::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, Result, ToolServer};
