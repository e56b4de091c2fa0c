use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{self, HeaderMap, HeaderName, header},
    response::Response,
};

use crate::error::ProxyError;

// Requests with larger bodies are refused rather than buffered.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Headers that describe a single connection and are never passed on (RFC 9110 §7.6.1).
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// UpstreamProxy
///
/// Forwards requests the gate has allowed, and no local route serves, to the
/// application that renders the portal's pages. Cloning shares the connection pool.
#[derive(Clone)]
pub struct UpstreamProxy {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamProxy {
    pub fn new(base_url: &str) -> Result<Self, ProxyError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProxyError::InvalidUrl(base_url));
        }

        // Redirects from the renderer are returned to the browser untouched.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// forward
    ///
    /// Replays method, end-to-end headers and the buffered body against the upstream,
    /// and answers with the upstream status, end-to-end headers and full body.
    /// `host` and the hop-by-hop headers are dropped in both directions.
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", self.base_url, path_and_query);

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);

        let body = to_bytes(body, MAX_BODY_BYTES).await?;

        let upstream = self
            .client
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let mut upstream_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut upstream_headers);
        // The body is re-framed by axum.
        upstream_headers.remove(header::CONTENT_LENGTH);

        let mut response = http::Response::builder().status(upstream.status());
        if let Some(response_headers) = response.headers_mut() {
            response_headers.extend(upstream_headers);
        }

        let bytes = upstream.bytes().await?;
        Ok(response.body(Body::from(bytes))?)
    }
}

/// Removes the hop-by-hop headers, including any extra names the `Connection` header lists.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}
