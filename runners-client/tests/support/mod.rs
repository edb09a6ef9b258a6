//! Scripted transport shared by the integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use runners_client::transport::ResponseBody;
use runners_client::{HttpRequest, HttpTransport, RawResponse, TransportError};

/// A request as seen by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        url: String,
    },
    Post {
        url: String,
        content_type: String,
        body: Vec<u8>,
    },
    Execute {
        method: Method,
        url: String,
        content_type: Option<String>,
        body: Option<Vec<u8>>,
    },
}

/// What the transport answers with for one call
pub enum Reply {
    Response(u16, String),
    UnreadableBody(u16),
    Error(&'static str),
}

impl Reply {
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::Response(status, body.into())
    }
}

/// Body that counts reads and can be made to fail
struct ScriptedBody {
    bytes: Option<Vec<u8>>,
    reads: Arc<AtomicUsize>,
}

#[async_trait]
impl ResponseBody for ScriptedBody {
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.bytes.take() {
            Some(bytes) => Ok(bytes),
            None => Err(TransportError::other("simulated read error")),
        }
    }
}

/// Transport double that replays queued replies and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
    body_reads: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of times a response body was read
    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }

    fn answer(&self, call: Call) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(call);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected call: no reply scripted");

        let reads = Arc::clone(&self.body_reads);
        match reply {
            Reply::Response(status, body) => Ok(RawResponse::new(
                status,
                ScriptedBody {
                    bytes: Some(body.into_bytes()),
                    reads,
                },
            )),
            Reply::UnreadableBody(status) => Ok(RawResponse::new(
                status,
                ScriptedBody { bytes: None, reads },
            )),
            Reply::Error(message) => Err(TransportError::other(message)),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.answer(Call::Get {
            url: url.to_string(),
        })
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        self.answer(Call::Post {
            url: url.to_string(),
            content_type: content_type.to_string(),
            body,
        })
    }

    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let content_type = request
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        self.answer(Call::Execute {
            method: request.method,
            url: request.url,
            content_type,
            body: request.body,
        })
    }
}
