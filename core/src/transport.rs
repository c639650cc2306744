//! The single seam between the client and the network.
//!
//! # Design
//! `Transport` has one method: execute a GET for an `HttpRequest` and hand
//! back the status and body as data. Status interpretation stays in the
//! client, so a transport only fails when no response was received at all.
//! Tests inject their own transport or point `UreqTransport` at a local
//! server root.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Production root of the catalog service.
pub const DEFAULT_API_ROOT: &str = "https://www.goodreads.com";

/// Executes catalog requests.
///
/// Implementations must be shareable across threads; the client holds one
/// and never mutates it.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`, bound to an API root.
///
/// `verbose` raises request logging from `debug` to `info`; it has no other
/// effect.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    api_root: String,
    verbose: bool,
}

impl UreqTransport {
    pub fn new(api_root: &str) -> Self {
        // 4xx/5xx come back as responses so the client can classify them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            api_root: api_root.trim_end_matches('/').to_string(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("api_root", &self.api_root)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_API_ROOT)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url(&self.api_root);
        // The query carries the API key; logs and errors only see the path.
        let endpoint = format!("{}{}", self.api_root, request.path);
        if self.verbose {
            info!(%endpoint, "GET");
        } else {
            debug!(%endpoint, "GET");
        }

        let transport_err = |err: ureq::Error| ApiError::Transport {
            url: endpoint.clone(),
            source: Box::new(err),
        };

        let mut response = self.agent.get(&url).call().map_err(transport_err)?;
        let status = response.status().as_u16();
        let bytes = response.body_mut().read_to_vec().map_err(transport_err)?;
        let body = utf8_body(bytes)?;

        if self.verbose {
            info!(%endpoint, status, bytes = body.len(), "response");
        } else {
            debug!(%endpoint, status, bytes = body.len(), "response");
        }

        Ok(HttpResponse { status, body })
    }
}

/// A body that arrived but is not UTF-8 is a decode failure, not a transport one.
fn utf8_body(bytes: Vec<u8>) -> Result<String, ApiError> {
    String::from_utf8(bytes).map_err(|err| {
        debug!(error = %err, "response body is not UTF-8");
        ApiError::DeserializationError(format!("response body is not UTF-8: {err}"))
    })
}
