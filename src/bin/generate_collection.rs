//! Generates a Postman collection for the tools server.
//!
//! The collection covers discovery and every built-in tool, with curated
//! examples where available. No network access is needed.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use address_tools_server::Config;
use address_tools_server::domains::collection::{
    CollectionOptions, DEFAULT_OUTPUT, generate_collection, write_collection,
};
use address_tools_server::domains::tools::build_tool_registry;

#[derive(Parser, Debug)]
#[command(name = "generate-collection", version, about = "Generate a Postman collection for the tools server")]
struct Cli {
    /// Path of the collection file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Value of the `base_url` collection variable
    #[arg(long, default_value = "localhost")]
    base_url: String,

    /// Value of the `port` collection variable
    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let registry = build_tool_registry(&Config::default()).context("failed to build tool registry")?;
    let options = CollectionOptions {
        base_url: cli.base_url,
        port: cli.port,
    };

    let collection = generate_collection(&registry, &options);
    write_collection(&collection, &cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("Postman collection generated: {}", cli.output.display());
    println!("  Name: {}", collection.info.name);
    println!("  Requests: {}", collection.item.len());
    for item in &collection.item {
        println!("    - {} {}", item.request.method, item.name);
    }
    println!("  Variables: base_url={}, port={}", options.base_url, options.port);

    Ok(())
}
