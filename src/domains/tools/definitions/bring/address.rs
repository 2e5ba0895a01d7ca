//! Bring address details tool.
//!
//! Looks up address suggestions from the Bring address API for a free-text
//! query within one country.

use anyhow::Context;
use http::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::core::config::BringConfig;
use crate::core::error::{Error, Result};
use crate::domains::tools::handlers::{ToolFailure, ToolHandler, ToolOutput};
use crate::domains::tools::params::ToolParams;
use crate::domains::tools::schema::{ParameterSpec, ParameterType, ToolDefinition};

use super::common::{KEY_HEADER, UID_HEADER, credentials, extract_addresses, suggestions_url};

/// Address details tool backed by the Bring address API.
#[derive(Debug, Clone)]
pub struct AddressDetailsTool {
    client: reqwest::Client,
    config: BringConfig,
}

impl AddressDetailsTool {
    /// Tool name as registered in the registry.
    pub const NAME: &'static str = "address-details";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Fetches address details from Bring API based on query and country code";

    /// Maximum number of suggestions requested from Bring.
    pub const RESULT_LIMIT: u32 = 5;

    /// Create the tool with its own HTTP client.
    pub fn new(config: BringConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("cannot build Bring HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Sets a custom reqwest client (e.g. for testing with `no_proxy()`).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Declared shape of this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION)
            .with_parameter(ParameterSpec::required(
                "query",
                ParameterType::String,
                "Query string for address details",
            ))
            .with_parameter(ParameterSpec::required(
                "countryCode",
                ParameterType::String,
                "Country code for the Bring API",
            ))
    }

    /// Query Bring for address suggestions.
    ///
    /// A non-success status is reported as a [`ToolFailure`], not an error.
    #[instrument(skip(self))]
    pub async fn lookup(&self, query: &str, country_code: &str) -> anyhow::Result<ToolOutput> {
        if self.config.require_credentials && !self.config.has_credentials() {
            warn!("Refusing address lookup: Bring credentials are not configured");
            return Ok(ToolFailure::new(
                "missing_credentials",
                "Bring API credentials are not configured",
            )
            .into());
        }

        let url = suggestions_url(&self.config.base_url, country_code, query, Self::RESULT_LIMIT)?;
        let (uid, key) = credentials(&self.config);

        info!("Requesting address suggestions from {}", url.path());

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(UID_HEADER, uid)
            .header(KEY_HEADER, key)
            .send()
            .await
            .context("request to Bring API failed")?;

        let status = response.status();
        if !status.is_success() {
            warn!("Bring API returned status {}", status);
            return Ok(ToolFailure::new(
                "upstream_status",
                format!("Bring API returned status {}", status.as_u16()),
            )
            .with_detail("status", status.as_u16())
            .into());
        }

        let body: Value = response
            .json()
            .await
            .context("failed to parse Bring API response")?;

        let addresses = extract_addresses(body);
        info!(
            "Bring returned {} suggestion(s)",
            addresses.as_array().map_or(0, Vec::len)
        );

        Ok(ToolOutput::success(addresses))
    }
}

#[async_trait::async_trait]
impl ToolHandler for AddressDetailsTool {
    async fn call(&self, params: ToolParams) -> anyhow::Result<ToolOutput> {
        let query = params.require_str("query")?;
        let country_code = params.require_str("countryCode")?;
        self.lookup(query, country_code).await
    }
}
