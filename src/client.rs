//! HTTP transport used by [`Kinesis`](crate::Kinesis).
//!
//! A [`RequestExecutor`] performs exactly one request/response exchange. The
//! default executor is a pooled hyper client over rustls; any other executor
//! can be injected with [`Kinesis::with_executor`](crate::Kinesis::with_executor).

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{
        Client,
        connect::{Connect, HttpConnector},
    },
    rt::TokioExecutor,
};

use crate::auth::{Credentials, Signer};

/// A fully buffered HTTP request.
pub type Request = http::Request<Bytes>;

/// Error from a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to send the request.
    #[error("failed to send request: {0}")]
    Send(#[from] hyper_util::client::legacy::Error),
    /// Failed while receiving the response body.
    #[error("failed to receive response: {0}")]
    Receive(#[from] hyper::Error),
    /// The exchange did not complete within the request timeout.
    #[error("request timed out")]
    Timeout,
    /// Failure from a custom executor.
    #[error("{0}")]
    Other(String),
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct UnaryResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl UnaryResponse {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}

/// Performs one HTTP request/response exchange.
///
/// Implementations must not retry; every call to
/// [`execute_unary`](RequestExecutor::execute_unary) maps to at most one
/// request on the wire.
#[async_trait]
pub trait RequestExecutor: Send + Sync + 'static {
    async fn execute_unary(&self, request: Request) -> Result<UnaryResponse, Error>;
}

/// Pooled hyper client.
pub struct Pool<C> {
    client: Client<C, Full<Bytes>>,
    request_timeout: Duration,
}

impl<C> Pool<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    pub fn new(connector: C, request_timeout: Duration) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build(connector),
            request_timeout,
        }
    }
}

impl<C> std::fmt::Debug for Pool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> RequestExecutor for Pool<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    async fn execute_unary(&self, request: Request) -> Result<UnaryResponse, Error> {
        let (parts, body) = request.into_parts();
        let request = http::Request::from_parts(parts, Full::new(body));

        let exchange = async {
            let response = self.client.request(request).await?;
            let (parts, body) = response.into_parts();
            let body = body.collect().await?.to_bytes();
            Ok::<_, Error>(UnaryResponse::new(parts.status, parts.headers, body))
        };

        tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| Error::Timeout)?
    }
}

/// HTTPS connector with webpki roots. Plain `http` endpoints are allowed so
/// that local emulators can be targeted.
pub fn default_connector(connect_timeout: Option<Duration>) -> HttpsConnector<HttpConnector> {
    let mut http = HttpConnector::new();
    http.set_connect_timeout(connect_timeout);
    http.enforce_http(false);

    HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http)
}

/// Signs requests and hands them to the executor.
#[derive(Clone)]
pub(crate) struct Transport {
    executor: Arc<dyn RequestExecutor>,
    credentials: Credentials,
    signer: Signer,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub(crate) fn new(
        executor: Arc<dyn RequestExecutor>,
        credentials: Credentials,
        signer: Signer,
    ) -> Self {
        Self {
            executor,
            credentials,
            signer,
        }
    }

    pub(crate) async fn send(&self, mut request: Request) -> Result<UnaryResponse, Error> {
        self.signer
            .sign(&mut request, &self.credentials, time::OffsetDateTime::now_utc())
            .map_err(|e| Error::Other(format!("failed to sign request: {e}")))?;
        self.executor.execute_unary(request).await
    }
}
