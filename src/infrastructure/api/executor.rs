//! Request executor: one GET, uniform error shape, envelope unwrapping

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::error::{ErrorBody, FetchError};
use super::request::RequestDescriptor;

/// Status and body text of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can carry a descriptor over the wire.
///
/// Only transport-level failures are errors here; any status code, 2xx or
/// not, comes back as a [`RawResponse`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, FetchError>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| FetchError::TransportError {
            cause: format!("failed to create HTTP client: {e}"),
        })?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, FetchError> {
        let mut builder = self
            .http
            .request(request.method().clone(), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(RawResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    let cause = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    FetchError::TransportError { cause }
}

/// Executes descriptors and normalizes the outcome
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn http(timeout: Option<Duration>) -> Result<Self, FetchError> {
        Ok(Self::new(Arc::new(HttpTransport::new(timeout)?)))
    }

    /// Perform the request and return the effective payload.
    ///
    /// Fails with [`FetchError::MissingCredential`] before touching the
    /// network when the descriptor carries no bearer token. On success the
    /// top-level `data` field is returned when present, otherwise the whole
    /// decoded body.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Value, FetchError> {
        let context = request.kind().title();
        debug!(%context, url = %request.url(), "performing fetch");

        let Some(credential) = request.bearer() else {
            error!(%context, "no API credential configured");
            return Err(FetchError::MissingCredential);
        };
        debug!(%context, jwt = %credential.preview(), "using credential");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                error!(%context, error = %err, "fetch failed");
                return Err(err);
            }
        };
        info!(%context, status = response.status, "API response");

        if !response.is_success() {
            let body = ErrorBody::parse(response.body);
            if matches!(body, ErrorBody::Text(_)) {
                warn!(%context, "could not parse error body as JSON");
            }
            error!(%context, status = response.status, body = %body, "API error");
            return Err(FetchError::HttpError {
                status: response.status,
                body,
            });
        }

        let decoded: Value = serde_json::from_str(&response.body).map_err(|e| {
            error!(%context, error = %e, "response body is not JSON");
            FetchError::Decode {
                cause: e.to_string(),
            }
        })?;
        Ok(unwrap_envelope(decoded))
    }
}

/// Return `body.data` when the body is an object with a `data` field
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, Credential, DEFAULT_BASE_URL};
    use crate::domain::NetworkId;
    use crate::infrastructure::api::request::Endpoints;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        reply: Result<RawResponse, FetchError>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(reply: Result<RawResponse, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn ok(status: u16, body: &str) -> Arc<Self> {
            Self::new(Ok(RawResponse {
                status,
                body: body.to_string(),
            }))
        }
    }

    #[async_trait::async_trait]
    impl Transport for Canned {
        async fn send(&self, _request: &RequestDescriptor) -> Result<RawResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn descriptor(credential: Option<Credential>) -> RequestDescriptor {
        Endpoints::new(ApiConfig::new(DEFAULT_BASE_URL, credential))
            .balances("0xabc", NetworkId::Mainnet)
            .unwrap()
    }

    #[tokio::test]
    async fn test_data_envelope_is_unwrapped() {
        let transport = Canned::ok(200, r#"{"data":[{"symbol":"ETH"}],"statistics":{"rows":1}}"#);
        let executor = Executor::new(transport.clone());
        let value = executor.execute(&descriptor(Credential::new("t"))).await.unwrap();
        assert_eq!(value, json!([{ "symbol": "ETH" }]));
    }

    #[tokio::test]
    async fn test_body_without_envelope_is_returned_verbatim() {
        let executor = Executor::new(Canned::ok(200, r#"{"symbol":"GRT"}"#));
        let value = executor.execute(&descriptor(Credential::new("t"))).await.unwrap();
        assert_eq!(value, json!({ "symbol": "GRT" }));
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let transport = Canned::ok(200, "{}");
        let executor = Executor::new(transport.clone());
        let err = executor.execute(&descriptor(None)).await.unwrap_err();
        assert_eq!(err, FetchError::MissingCredential);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_http_error_bodies() {
        let executor = Executor::new(Canned::ok(404, r#"{"message":"not found"}"#));
        let err = executor.execute(&descriptor(Credential::new("t"))).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 404,
                body: ErrorBody::Json(json!({ "message": "not found" })),
            }
        );

        let executor = Executor::new(Canned::ok(502, "upstream unavailable"));
        let err = executor.execute(&descriptor(Credential::new("t"))).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 502,
                body: ErrorBody::Text("upstream unavailable".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_transport_and_decode_failures() {
        let executor = Executor::new(Canned::new(Err(FetchError::TransportError {
            cause: "dns".to_string(),
        })));
        let err = executor.execute(&descriptor(Credential::new("t"))).await.unwrap_err();
        assert!(matches!(err, FetchError::TransportError { .. }));

        let executor = Executor::new(Canned::ok(200, "<html>"));
        let err = executor.execute(&descriptor(Credential::new("t"))).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn test_unwrap_envelope_leaves_non_objects() {
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({ "data": null })), json!(null));
    }
}
