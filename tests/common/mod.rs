#![allow(dead_code)]
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use kinesis::{
    Credentials, Kinesis,
    bytes::Bytes,
    client::{self, Request, RequestExecutor, UnaryResponse},
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri},
    types::KinesisConfig,
};
use serde_json::Value;

/// A request as seen by the executor.
#[derive(Debug, Clone)]
pub struct Sent {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Sent {
    pub fn target(&self) -> &str {
        self.headers["x-amz-target"].to_str().unwrap()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Executor that records requests and replays canned responses in order.
#[derive(Clone, Default)]
pub struct MockExecutor {
    sent: Arc<Mutex<Vec<Sent>>>,
    responses: Arc<Mutex<VecDeque<Result<UnaryResponse, client::Error>>>>,
}

impl MockExecutor {
    pub fn respond(&self, status: StatusCode, body: &str) -> &Self {
        self.respond_with(status, HeaderMap::new(), body)
    }

    pub fn respond_with(&self, status: StatusCode, headers: HeaderMap, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(UnaryResponse::new(status, headers, body.to_owned())));
        self
    }

    pub fn fail(&self, err: client::Error) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// The single request sent so far.
    pub fn only_request(&self) -> Sent {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one request");
        sent.into_iter().next().unwrap()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute_unary(&self, request: Request) -> Result<UnaryResponse, client::Error> {
        let (parts, body) = request.into_parts();
        self.sent.lock().unwrap().push(Sent {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(client::Error::Other("no canned response".into())))
    }
}

pub fn mock_client() -> (Kinesis, MockExecutor) {
    let executor = MockExecutor::default();
    let config = KinesisConfig::new(Credentials::new("AKIDEXAMPLE", "secret"), "us-east-1")
        .expect("valid config");
    let kinesis = Kinesis::with_executor(config, executor.clone()).expect("valid client");
    (kinesis, executor)
}

pub fn request_id(id: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-amzn-requestid", HeaderValue::from_static(id));
    headers
}
