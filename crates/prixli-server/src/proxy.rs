//! Upstream forwarding.
//!
//! Requests that pass the gate are proxied to the application origin with
//! method, path, query, headers and body preserved. The edge owns no pages
//! itself.

use crate::{
    config::UpstreamConfig,
    error::{EdgeError, EdgeResult},
};
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use std::time::Duration;
use tracing::debug;

/// Largest request body the edge will buffer for forwarding.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Headers that must not be forwarded in either direction.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

/// Forwards allowed requests to the configured application origin.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    client: reqwest::Client,
    origin: url::Url,
}

impl UpstreamProxy {
    /// Build a proxy for the configured origin.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let origin = url::Url::parse(&config.origin)?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, origin })
    }

    /// Forward one request and translate the upstream response.
    pub async fn forward(&self, req: Request<Body>) -> EdgeResult<Response<Body>> {
        let (parts, body) = req.into_parts();

        let mut url = self.origin.clone();
        url.set_path(parts.uri.path());
        url.set_query(parts.uri.query());

        let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
            .map_err(|_| EdgeError::BadRequest(format!("method {}", parts.method)))?;

        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|_| EdgeError::BadRequest("request body too large".to_string()))?;

        debug!(method = %method, url = %url, "forwarding to upstream");

        let mut upstream = self.client.request(method, url);
        for (name, value) in &parts.headers {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            upstream = upstream.header(name.as_str(), value.as_bytes());
        }

        let upstream_response = upstream.body(body).send().await?;

        into_axum_response(upstream_response).await
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|header| header.eq_ignore_ascii_case(name))
}

async fn into_axum_response(upstream: reqwest::Response) -> EdgeResult<Response<Body>> {
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|err| EdgeError::Upstream(err.to_string()))?;

    let mut builder = Response::builder().status(status);
    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let bytes = upstream.bytes().await?;

    builder
        .body(Body::from(bytes))
        .map_err(|err| EdgeError::Upstream(err.to_string()))
}
