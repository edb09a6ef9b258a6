//! Transport abstraction
//!
//! The runners client never talks to the network directly. It issues requests
//! through [`HttpTransport`], which lets tests substitute a scripted double and
//! lets callers layer timeouts or authentication into the transport.
//!
//! Response bodies are single-use. A [`RawResponse`] owns its body and frees it
//! when dropped, so every exit path releases the underlying connection.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};

use crate::auth::ClientCredentials;
use crate::error::TransportError;

/// Content type used for every JSON request body
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// An arbitrary request handed to [`HttpTransport::execute`]
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a request with no headers and no body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any previous value
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a request body
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A readable response body
#[async_trait]
pub trait ResponseBody: Send {
    /// Read the remaining body to the end
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl ResponseBody for reqwest::Response {
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }
}

#[async_trait]
impl ResponseBody for Vec<u8> {
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError> {
        Ok(std::mem::take(self))
    }
}

/// Status code plus an unread body
pub struct RawResponse {
    status: u16,
    body: Box<dyn ResponseBody>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Build a response from an in-memory body
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, body.into())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Consume the response and read its whole body
    pub async fn bytes(mut self) -> Result<Vec<u8>, TransportError> {
        self.body.read_all().await
    }

    /// Consume the response and read its body as (lossy) UTF-8 text
    pub async fn text(self) -> Result<String, TransportError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl From<reqwest::Response> for RawResponse {
    fn from(response: reqwest::Response) -> Self {
        Self::new(response.status().as_u16(), response)
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Capabilities the runners client needs from an HTTP stack
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;

    /// Issue a POST request with the given content type and body
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError>;

    /// Issue an arbitrary request
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// [`HttpTransport`] backed by reqwest
///
/// Retries, timeouts and connection reuse are whatever the wrapped
/// `reqwest::Client` is configured to do.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    credentials: Option<Arc<ClientCredentials>>,
}

impl ReqwestTransport {
    /// Create an unauthenticated transport
    pub fn new(client: Client) -> Self {
        Self {
            client,
            credentials: None,
        }
    }

    /// Create a transport that sends a bearer token obtained from `credentials`
    /// with every request
    pub fn with_credentials(client: Client, credentials: ClientCredentials) -> Self {
        Self {
            client,
            credentials: Some(Arc::new(credentials)),
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<RawResponse, TransportError> {
        let builder = match &self.credentials {
            Some(credentials) => {
                let token = credentials.access_token(&self.client).await?;
                builder.bearer_auth(token)
            }
            None => builder,
        };

        let response = builder.send().await?;
        Ok(response.into())
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.send(self.client.get(url)).await
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        let builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        self.send(builder).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        self.send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_body_is_read_once() {
        let response = RawResponse::from_bytes(200, "{}");
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_text_is_lossy() {
        let response = RawResponse::from_bytes(400, vec![b'o', b'k', 0xff]);
        assert_eq!(response.text().await.unwrap(), "ok\u{fffd}");
    }

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::new(Method::PUT, "https://example.com/state")
            .header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .body(b"{}".to_vec());

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.url, "https://example.com/state");
        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_JSON
        );
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_raw_response_debug_hides_body() {
        let response = RawResponse::from_bytes(204, "");
        assert_eq!(
            format!("{:?}", response),
            "RawResponse { status: 204, .. }"
        );
    }
}
