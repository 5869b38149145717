use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::http::header::{
    ACCEPT, CACHE_CONTROL, CONTENT_TYPE, COOKIE, HeaderName, LOCATION, SET_COOKIE,
};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use reqwest::Url;
use tracing::debug;

/// Headers passed from the browser to the backend.
const REQUEST_HEADERS: [HeaderName; 3] = [CONTENT_TYPE, ACCEPT, COOKIE];

/// Single-valued headers relayed from the backend to the browser.
/// `set-cookie` is relayed separately since it may repeat.
const RESPONSE_HEADERS: [HeaderName; 3] = [CONTENT_TYPE, LOCATION, CACHE_CONTROL];

/// The chat backend the page talks to. Requests are relayed once, without
/// retries, and redirects are handed back to the browser untouched.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    base: Url,
}

impl Upstream {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base =
            Url::parse(base_url).with_context(|| format!("invalid backend url {base_url}"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed building backend http client")?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a browser-side path (with optional query) below the base url,
    /// keeping any path prefix the base carries.
    pub fn url_for(&self, path_and_query: &str) -> Result<Url> {
        let relative = path_and_query.trim_start_matches('/');
        self.base
            .join(relative)
            .with_context(|| format!("invalid upstream path {path_and_query}"))
    }

    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response> {
        let url = self.url_for(path_and_query)?;
        debug!("forwarding {method} {url}");

        let response = self
            .client
            .request(method, url.clone())
            .headers(forwardable_request_headers(headers))
            .body(body)
            .send()
            .await
            .with_context(|| format!("backend request to {url} failed"))?;

        let status = response.status();
        let relayed = relayed_response_headers(response.headers());
        let payload = response
            .bytes()
            .await
            .with_context(|| format!("failed reading backend response from {url}"))?;

        let mut builder = Response::builder().status(status);
        if let Some(target) = builder.headers_mut() {
            target.extend(relayed);
        }
        builder
            .body(Body::from(payload))
            .context("failed building relayed response")
    }
}

fn copy_named(source: &HeaderMap, names: &[HeaderName], target: &mut HeaderMap) {
    for name in names {
        if let Some(value) = source.get(name) {
            target.insert(name.clone(), value.clone());
        }
    }
}

fn forwardable_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();
    copy_named(headers, &REQUEST_HEADERS, &mut forwarded);
    forwarded
}

fn relayed_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::new();
    copy_named(headers, &RESPONSE_HEADERS, &mut relayed);
    for cookie in headers.get_all(SET_COOKIE) {
        relayed.append(SET_COOKIE, cookie.clone());
    }
    relayed
}
