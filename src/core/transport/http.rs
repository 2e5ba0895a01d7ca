//! HTTP transport implementation.
//!
//! Serves tool discovery and invocation as plain JSON over HTTP so any HTTP
//! client (curl, Postman, tool-hosting platforms) can use the server.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::StatusCode;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::ToolServer;
use crate::domains::tools::{ParameterIssue, ToolError};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Error response returned by the HTTP layer.
///
/// Serialises as `{ "error": { "code", "message", "parameters"? } }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    parameters: Vec<ParameterIssue>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            parameters: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut error = json!({
            "code": self.code,
            "message": self.message,
        });
        if !self.parameters.is_empty() {
            error["parameters"] = json!(self.parameters);
        }
        (self.status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            ToolError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, code, message),
            ToolError::Validation(issues) => Self {
                parameters: issues,
                ..Self::new(StatusCode::BAD_REQUEST, code, message)
            },
            // Fault details stay in the logs.
            ToolError::Handler(_) | ToolError::InvalidDefinition(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "Tool execution failed",
            ),
        }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the router without binding a socket.
    pub fn router(server: ToolServer, enable_cors: bool) -> Router {
        let mut app = Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_check))
            .route("/discovery", get(discovery))
            .route("/tools/{name}", post(invoke_tool))
            .with_state(server)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        if enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport until Ctrl-C.
    pub async fn run(self, server: ToolServer) -> TransportResult<()> {
        let addr = self.address();
        info!("Starting transport: {}", self.config.description());

        let app = Self::router(server, self.config.enable_cors);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Discovery: GET  /discovery");
        info!("  → Invoke:    POST /tools/{{name}}");
        info!("  → Health:    GET  /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Root handler - provides API info.
async fn root_handler(State(server): State<ToolServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "endpoints": {
            "discovery": "/discovery",
            "tools": "/tools/{name}",
            "health": "/health"
        },
        "tools": server.registry().tool_names()
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// List registered tools.
async fn discovery(State(server): State<ToolServer>) -> impl IntoResponse {
    info!("Processing discovery request");
    Json(json!(server.discovery()))
}

/// Invoke a tool with the JSON request body as parameters.
#[instrument(skip_all, fields(tool))]
async fn invoke_tool(
    State(server): State<ToolServer>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    tracing::Span::current().record("tool", name.as_str());
    info!("Received tool invocation: {}", name);

    let raw = parse_body(&body)?;

    let output = server.invoke(&name, raw).await?;
    Ok(Json(output.into_json()))
}

/// Parse a request body; an empty body means no parameters.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "invalid_json",
            format!("Request body is not valid JSON: {}", e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::core::config::BringConfig;
    use crate::domains::tools::definitions::AddressDetailsTool;
    use crate::domains::tools::{ToolOutput, ToolParams, ToolRegistry, handler_fn};
    use axum::body::Body;
    use http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_server(bring_base_url: &str) -> ToolServer {
        let bring = BringConfig {
            base_url: bring_base_url.to_string(),
            ..BringConfig::default()
        };
        let client = reqwest::Client::builder().no_proxy().build().unwrap();

        let mut registry = ToolRegistry::new();
        registry
            .register(
                AddressDetailsTool::definition(),
                Arc::new(AddressDetailsTool::new(bring).unwrap().with_client(client)),
            )
            .unwrap();
        registry
            .register(
                crate::domains::tools::ToolDefinition::new("explode", "Always faults"),
                Arc::new(handler_fn(|_params: ToolParams| async {
                    Err::<ToolOutput, _>(anyhow::anyhow!("secret internal detail"))
                })),
            )
            .unwrap();

        ToolServer::new(Config::default(), registry)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_discovery_endpoint() {
        let app = HttpTransport::router(test_server("http://127.0.0.1:9"), true);
        let (status, body) = send(app, get_req("/discovery")).await;

        assert_eq!(status, StatusCode::OK);
        let tools = body["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "address-details");
        assert_eq!(tools[0]["parameters"][1]["name"], "countryCode");
        assert_eq!(tools[0]["parameters"][1]["type"], "string");
        assert_eq!(tools[0]["parameters"][1]["required"], true);
        assert_eq!(tools[1]["name"], "explode");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_404() {
        let app = HttpTransport::router(test_server("http://127.0.0.1:9"), false);
        let (status, body) = send(app, post("/tools/nope", "{}")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_missing_parameter_is_400() {
        let app = HttpTransport::router(test_server("http://127.0.0.1:9"), false);
        let (status, body) = send(
            app,
            post("/tools/address-details", r#"{"query": "Test address"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["parameters"][0]["parameter"], "countryCode");
        assert!(body["error"]["message"].as_str().unwrap().contains("countryCode"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_400() {
        let app = HttpTransport::router(test_server("http://127.0.0.1:9"), false);
        let (status, body) = send(app, post("/tools/address-details", "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_json");
    }

    #[tokio::test]
    async fn test_handler_fault_is_500_without_details() {
        let app = HttpTransport::router(test_server("http://127.0.0.1:9"), false);
        let (status, body) = send(app, post("/tools/explode", "")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "handler_error");
        assert!(!body.to_string().contains("secret internal detail"));
    }

    #[tokio::test]
    async fn test_address_lookup_end_to_end() {
        let bring = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/address/api/NO/addresses/suggestions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "addresses": [{ "id": 1 }]
            })))
            .expect(1)
            .mount(&bring)
            .await;

        let app = HttpTransport::router(test_server(&bring.uri()), true);
        let (status, body) = send(
            app,
            post(
                "/tools/address-details",
                r#"{"parameters": {"query": "Karl Johans gate 1", "countryCode": "NO"}}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "id": 1 }]));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_200_with_error_body() {
        let bring = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&bring)
            .await;

        let app = HttpTransport::router(test_server(&bring.uri()), false);
        let (status, body) = send(
            app,
            post(
                "/tools/address-details",
                r#"{"query": "Kungsgatan 1", "countryCode": "SE"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], true);
        assert_eq!(body["status"], 404);
        assert!(body["message"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let server = test_server("http://127.0.0.1:9");

        let (status, body) = send(HttpTransport::router(server.clone(), false), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(HttpTransport::router(server, false), get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "address-tools");
        assert_eq!(body["tools"], json!(["address-details", "explode"]));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
        assert_eq!(parse_body(br#"{"a":1}"#).unwrap(), json!({ "a": 1 }));
        assert_eq!(parse_body(b"[").unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
