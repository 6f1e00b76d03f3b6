// File: lavamusic-core/src/audio/discovery.rs
//
// Fetches a public audio-node list. There is no fallback list: any failure
// (transport, bad JSON, empty list) is surfaced to the caller.

use std::collections::HashMap;

use tracing::info;
use url::Url;

use lavamusic_common::models::NodeDescriptor;

use crate::http::HttpClient;
use crate::Error;

pub const DEFAULT_DISCOVERY_URL: &str = "https://lavainfo-api.deno.dev/nodes";

/// Build the discovery URL with the query the endpoint expects.
pub fn discovery_url(base: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base).map_err(|e| Error::Discovery(format!("invalid discovery URL '{base}': {e}")))?;
    url.query_pairs_mut()
        .append_pair("ssl", "false")
        .append_pair("version", "v4")
        .append_pair("format", "shoukaku");
    Ok(url)
}

pub async fn fetch_nodes(http: &dyn HttpClient, base: &str) -> Result<Vec<NodeDescriptor>, Error> {
    let url = discovery_url(base)?;
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    let body = http
        .get(url.to_string(), headers)
        .await
        .map_err(|e| Error::Discovery(format!("GET {url} failed: {e}")))?;
    let nodes: Vec<NodeDescriptor> =
        serde_json::from_str(&body).map_err(|e| Error::Discovery(format!("unexpected response from {url}: {e}")))?;

    if nodes.is_empty() {
        return Err(Error::Discovery(format!("{url} returned no nodes")));
    }
    info!("(NodeDiscovery) {} node(s) discovered", nodes.len());
    Ok(nodes)
}
