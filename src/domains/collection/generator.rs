//! Builds a Postman collection from the tool registry.
//!
//! Every registered tool gets at least one request. Tools with curated
//! example payloads get those instead of a placeholder body; the address
//! tool also gets an error case missing a required parameter.

use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use super::postman::{
    Body, CollectionInfo, Header, Item, PostmanCollection, Request, SCHEMA_V2_1, Url, Variable,
};
use crate::core::Result;
use crate::domains::tools::definitions::AddressDetailsTool;
use crate::domains::tools::{ParameterSpec, ParameterType, ToolDescriptor, ToolRegistry};

/// Default location of the generated collection.
pub const DEFAULT_OUTPUT: &str = "postman/OpalTools.postman_collection.json";

const COLLECTION_NAME: &str = "Opal Tools API";
const COLLECTION_DESCRIPTION: &str =
    "Collection for testing the tools server: discovery and tool invocations";
const BASE_URL_VAR: &str = "base_url";
const PORT_VAR: &str = "port";

/// Values for the collection-level variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    pub base_url: String,
    pub port: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            base_url: "localhost".to_string(),
            port: "3000".to_string(),
        }
    }
}

/// A named request body for one tool.
struct ExampleRequest {
    name: String,
    body: Value,
}

/// Build the collection: discovery first, then requests per tool in
/// registration order.
pub fn generate_collection(registry: &ToolRegistry, options: &CollectionOptions) -> PostmanCollection {
    let discovery = registry.discover();

    let mut items = vec![discovery_item()];
    for tool in &discovery.tools {
        for example in examples_for(tool) {
            items.push(tool_item(tool, example));
        }
    }

    debug!("Generated {} collection items", items.len());

    PostmanCollection {
        info: CollectionInfo {
            postman_id: Uuid::new_v4().to_string(),
            name: COLLECTION_NAME.to_string(),
            description: COLLECTION_DESCRIPTION.to_string(),
            schema: SCHEMA_V2_1.to_string(),
        },
        item: items,
        variable: vec![
            Variable::string(BASE_URL_VAR, &options.base_url),
            Variable::string(PORT_VAR, &options.port),
        ],
    }
}

/// Serialize the collection as pretty JSON, creating parent directories.
pub fn write_collection(collection: &PostmanCollection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(collection)?;
    std::fs::write(path, json)?;

    info!("Wrote Postman collection to {}", path.display());
    Ok(())
}

fn examples_for(tool: &ToolDescriptor<'_>) -> Vec<ExampleRequest> {
    if tool.name == AddressDetailsTool::NAME {
        return vec![
            ExampleRequest {
                name: "Address Details - Oslo Example".to_string(),
                body: json!({ "query": "Karl Johans gate 1", "countryCode": "NO" }),
            },
            ExampleRequest {
                name: "Address Details - Sweden Example".to_string(),
                body: json!({ "query": "Kungsgatan 1", "countryCode": "SE" }),
            },
            ExampleRequest {
                name: "Address Details - Error Case".to_string(),
                body: json!({ "query": "Test address" }),
            },
        ];
    }

    vec![ExampleRequest {
        name: tool.name.to_string(),
        body: placeholder_body(tool.parameters),
    }]
}

fn placeholder_body(parameters: &[ParameterSpec]) -> Value {
    let body: Map<String, Value> = parameters
        .iter()
        .map(|p| {
            let value = match p.param_type {
                ParameterType::String => json!(""),
                ParameterType::Integer => json!(0),
                ParameterType::Number => json!(0.0),
                ParameterType::Boolean => json!(false),
                ParameterType::List => json!([]),
                ParameterType::Dictionary => json!({}),
            };
            (p.name.clone(), value)
        })
        .collect();
    Value::Object(body)
}

fn discovery_item() -> Item {
    Item {
        name: "Get Tool Discovery".to_string(),
        request: Request {
            method: "GET".to_string(),
            header: vec![Header::text("Accept", "application/json")],
            body: None,
            url: url(&["discovery"]),
        },
        response: Vec::new(),
    }
}

fn tool_item(tool: &ToolDescriptor<'_>, example: ExampleRequest) -> Item {
    let path: Vec<&str> = tool.endpoint.trim_start_matches('/').split('/').collect();

    Item {
        name: example.name,
        request: Request {
            method: tool.http_method.to_string(),
            header: vec![
                Header::text("Content-Type", "application/json"),
                Header::text("Accept", "application/json"),
            ],
            // Only fails for non-string map keys, which a JSON object never has.
            body: Body::json(&example.body).ok(),
            url: url(&path),
        },
        response: Vec::new(),
    }
}

fn url(path: &[&str]) -> Url {
    Url {
        raw: format!("http://{{{{{BASE_URL_VAR}}}}}:{{{{{PORT_VAR}}}}}/{}", path.join("/")),
        protocol: "http".to_string(),
        host: vec![format!("{{{{{BASE_URL_VAR}}}}}")],
        port: format!("{{{{{PORT_VAR}}}}}"),
        path: path.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::{ToolDefinition, ToolOutput, ToolParams, build_tool_registry, handler_fn};
    use std::sync::Arc;

    fn builtin_collection() -> PostmanCollection {
        let registry = build_tool_registry(&Config::default()).unwrap();
        generate_collection(&registry, &CollectionOptions::default())
    }

    #[test]
    fn test_collection_info() {
        let collection = builtin_collection();
        assert_eq!(collection.info.name, "Opal Tools API");
        assert_eq!(collection.info.schema, SCHEMA_V2_1);
        assert!(Uuid::parse_str(&collection.info.postman_id).is_ok());
        assert_eq!(
            collection.variable,
            vec![
                Variable::string("base_url", "localhost"),
                Variable::string("port", "3000"),
            ]
        );
    }

    #[test]
    fn test_fresh_id_per_collection() {
        assert_ne!(builtin_collection().info.postman_id, builtin_collection().info.postman_id);
    }

    #[test]
    fn test_builtin_items() {
        let collection = builtin_collection();
        let names: Vec<&str> = collection.item.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Get Tool Discovery",
                "Address Details - Oslo Example",
                "Address Details - Sweden Example",
                "Address Details - Error Case",
            ]
        );

        let discovery = &collection.item[0].request;
        assert_eq!(discovery.method, "GET");
        assert!(discovery.body.is_none());
        assert_eq!(discovery.url.raw, "http://{{base_url}}:{{port}}/discovery");

        let oslo = &collection.item[1].request;
        assert_eq!(oslo.method, "POST");
        assert_eq!(oslo.url.path, vec!["tools", "address-details"]);
        assert_eq!(oslo.url.host, vec!["{{base_url}}"]);
        assert_eq!(oslo.url.port, "{{port}}");
        assert_eq!(
            oslo.header,
            vec![
                Header::text("Content-Type", "application/json"),
                Header::text("Accept", "application/json"),
            ]
        );
        assert_eq!(discovery.header, vec![Header::text("Accept", "application/json")]);
        let body: Value = serde_json::from_str(&oslo.body.as_ref().unwrap().raw).unwrap();
        assert_eq!(body, json!({ "query": "Karl Johans gate 1", "countryCode": "NO" }));

        let error_case = &collection.item[3].request;
        let body: Value = serde_json::from_str(&error_case.body.as_ref().unwrap().raw).unwrap();
        assert_eq!(body, json!({ "query": "Test address" }));
    }

    #[test]
    fn test_placeholder_for_unknown_tool() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDefinition::new("ping", "Ping")
                    .with_parameter(ParameterSpec::required("host", ParameterType::String, ""))
                    .with_parameter(ParameterSpec::optional("count", ParameterType::Integer, "")),
                Arc::new(handler_fn(|_: ToolParams| async {
                    Ok::<_, anyhow::Error>(ToolOutput::success(json!("pong")))
                })),
            )
            .unwrap();

        let collection = generate_collection(
            &registry,
            &CollectionOptions {
                base_url: "example.test".to_string(),
                port: "8080".to_string(),
            },
        );

        assert_eq!(collection.item.len(), 2);
        assert_eq!(collection.item[1].name, "ping");
        let body: Value =
            serde_json::from_str(&collection.item[1].request.body.as_ref().unwrap().raw).unwrap();
        assert_eq!(body, json!({ "host": "", "count": 0 }));
        assert_eq!(collection.variable[0].value, "example.test");
        assert_eq!(collection.variable[1].value, "8080");
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(builtin_collection()).unwrap();
        assert!(value["info"]["_postman_id"].is_string());
        assert_eq!(value["variable"][0]["type"], "string");
        assert_eq!(value["item"][1]["request"]["body"]["mode"], "raw");
        assert_eq!(value["item"][1]["request"]["body"]["options"]["raw"]["language"], "json");
        assert_eq!(value["item"][1]["response"], json!([]));
        assert!(value["item"][0]["request"].get("body").is_none());
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/collection.json");

        let collection = builtin_collection();
        write_collection(&collection, &path).unwrap();

        let written: PostmanCollection =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, collection);
    }
}
