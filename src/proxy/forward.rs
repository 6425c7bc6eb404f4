//! Reverse-proxy forwarding.
//!
//! # Responsibilities
//! - Rewrite the outbound request's scheme/authority to the chosen backend
//! - Keep path, query, method, headers and body intact
//! - Bound the upstream call with a timeout
//! - Relay the backend response verbatim (status, headers, body)

use std::str::FromStr;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{header, HeaderValue, Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use url::Url;

/// Shared outbound HTTP client type.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the outbound client shared by all request handlers.
pub fn client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Error type for a single forwarding attempt.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid backend address `{0}`")]
    Address(String),

    #[error("upstream timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
}

/// Forward a request to `target` and return the backend's response.
///
/// The backend failing here (after it passed selection) is a transport
/// error surfaced to the dispatcher, never a crash.
pub async fn forward(
    client: &HttpClient,
    target: &str,
    request: Request<Body>,
    timeout: Duration,
) -> Result<Response<Body>, ProxyError> {
    let bad_address = || ProxyError::Address(target.to_string());

    let target_url = Url::parse(target).map_err(|_| bad_address())?;
    let scheme = Scheme::try_from(target_url.scheme()).map_err(|_| bad_address())?;
    let host = target_url.host_str().ok_or_else(|| bad_address())?;
    let authority_text = match target_url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let authority = Authority::from_str(&authority_text).map_err(|_| bad_address())?;

    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.into_parts();
    uri_parts.scheme = Some(scheme);
    uri_parts.authority = Some(authority);
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(axum::http::uri::PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts).map_err(|_| bad_address())?;

    // Backends route on Host, so it must name the backend, not us.
    let host_value = HeaderValue::from_str(&authority_text).map_err(|_| bad_address())?;
    parts.headers.insert(header::HOST, host_value);

    let outbound = Request::from_parts(parts, body);

    match tokio::time::timeout(timeout, client.request(outbound)).await {
        Ok(Ok(response)) => {
            let (parts, body) = response.into_parts();
            Ok(Response::from_parts(parts, Body::new(body)))
        }
        Ok(Err(error)) => Err(ProxyError::Transport(error)),
        Err(_) => Err(ProxyError::Timeout),
    }
}
