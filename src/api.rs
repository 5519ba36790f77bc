use std::sync::Arc;

use http::header::{CONTENT_TYPE, InvalidHeaderValue, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::auth::Signer;
use crate::client::{self, RequestExecutor, Transport, UnaryResponse};
use crate::codec::{self, CodecError, Decode};
use crate::types::{
    AddTagsToStreamInput, CreateStreamInput, DeleteStreamInput, DescribeStreamInput,
    DescribeStreamOutput, GetRecordsInput, GetRecordsOutput, GetShardIteratorInput,
    GetShardIteratorOutput, KinesisConfig, ListStreamsInput, ListStreamsOutput,
    ListTagsForStreamInput, ListTagsForStreamOutput, MergeShardsInput, PutRecordInput,
    PutRecordOutput, PutRecordsInput, PutRecordsOutput, RemoveTagsFromStreamInput,
    SplitShardInput,
};

const TARGET_PREFIX: &str = "Kinesis_20131202";
const CONTENT_TYPE_JSON: &str = "application/x-amz-json-1.1";
const X_AMZ_TARGET: &str = "x-amz-target";

/// Descriptor of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, also the suffix of the `X-Amz-Target` header.
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// Whether a successful response carries a payload.
    pub has_output: bool,
}

impl Operation {
    /// Value of the `X-Amz-Target` header, e.g. `Kinesis_20131202.PutRecord`.
    pub fn target(&self) -> String {
        format!("{TARGET_PREFIX}.{}", self.name)
    }
}

pub(crate) trait ApiOperation {
    type Input: Serialize + Sync;
    type Output: Decode;
    const OPERATION: Operation;
}

macro_rules! operations {
    ($($marker:ident: $input:ty => $output:ty;)*) => {
        $(
            pub(crate) struct $marker;

            impl ApiOperation for $marker {
                type Input = $input;
                type Output = $output;
                const OPERATION: Operation = Operation {
                    name: stringify!($marker),
                    method: Method::POST,
                    path: "/",
                    has_output: <$output as Decode>::HAS_PAYLOAD,
                };
            }
        )*

        /// Every operation the client supports.
        pub const OPERATIONS: &[Operation] = &[$(<$marker as ApiOperation>::OPERATION),*];
    };
}

operations! {
    AddTagsToStream: AddTagsToStreamInput => ();
    CreateStream: CreateStreamInput => ();
    DeleteStream: DeleteStreamInput => ();
    DescribeStream: DescribeStreamInput => DescribeStreamOutput;
    GetRecords: GetRecordsInput => GetRecordsOutput;
    GetShardIterator: GetShardIteratorInput => GetShardIteratorOutput;
    ListStreams: ListStreamsInput => ListStreamsOutput;
    ListTagsForStream: ListTagsForStreamInput => ListTagsForStreamOutput;
    MergeShards: MergeShardsInput => ();
    PutRecord: PutRecordInput => PutRecordOutput;
    PutRecords: PutRecordsInput => PutRecordsOutput;
    RemoveTagsFromStream: RemoveTagsFromStreamInput => ();
    SplitShard: SplitShardInput => ();
}

#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    transport: Transport,
    base_url: Url,
    default_headers: HeaderMap,
}

impl JsonClient {
    pub(crate) fn init(config: &KinesisConfig) -> Result<Self, ApiError> {
        let connector = client::default_connector(Some(config.connection_timeout));
        let executor = client::Pool::new(connector, config.request_timeout);
        Self::init_with_executor(config, Arc::new(executor))
    }

    pub(crate) fn init_with_executor(
        config: &KinesisConfig,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        default_headers.insert(USER_AGENT, config.user_agent.clone());

        let endpoint = &config.endpoint;
        let signer = Signer::new(&endpoint.signing_name, &endpoint.signing_region);

        Ok(Self {
            transport: Transport::new(executor, config.credentials.clone(), signer),
            base_url: endpoint.url.clone(),
            default_headers,
        })
    }

    /// Performs exactly one signed round-trip for `O`.
    pub(crate) async fn invoke<O: ApiOperation>(
        &self,
        input: &O::Input,
    ) -> Result<O::Output, ApiError> {
        let operation = O::OPERATION;
        let url = self.base_url.join(operation.path)?;

        let mut request = http::Request::builder()
            .method(operation.method.clone())
            .uri(url.as_str())
            .body(codec::encode(input)?)?;
        let headers = request.headers_mut();
        headers.extend(self.default_headers.clone());
        headers.insert(X_AMZ_TARGET, HeaderValue::from_str(&operation.target())?);

        let response = self.transport.send(request).await.inspect_err(|e| {
            debug!(operation = operation.name, error = %e, "request failed");
        })?;
        debug!(
            operation = operation.name,
            status = %response.status(),
            "received response"
        );

        let response = response.into_result()?;
        Ok(O::Output::decode(response.body())?)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] http::Error),
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
    #[error("{1}")]
    Server(StatusCode, ApiErrorResponse),
}

impl From<client::Error> for ApiError {
    fn from(err: client::Error) -> Self {
        ClientError::from(err).into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connect: {0}")]
    Connect(String),
    #[error("timeout")]
    Timeout,
    #[error("connection closed early: {0}")]
    ConnectionClosedEarly(String),
    #[error("request canceled: {0}")]
    RequestCanceled(String),
    #[error("unexpected eof: {0}")]
    UnexpectedEof(String),
    #[error("connection reset: {0}")]
    ConnectionReset(String),
    #[error("connection aborted: {0}")]
    ConnectionAborted(String),
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("{0}")]
    Others(String),
}

impl ClientError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::Others(_))
    }
}

impl From<client::Error> for ClientError {
    fn from(err: client::Error) -> Self {
        let err_msg = err.to_string();
        match err {
            client::Error::Send(ref send_err) if send_err.is_connect() => {
                classify_io_source(&err, &err_msg).unwrap_or(Self::Connect(err_msg))
            }
            client::Error::Send(_) | client::Error::Receive(_) => {
                classify_hyper_source(&err, &err_msg)
                    .or_else(|| classify_io_source(&err, &err_msg))
                    .unwrap_or(Self::Others(err_msg))
            }
            client::Error::Timeout => Self::Timeout,
            client::Error::Other(_) => Self::Others(err_msg),
        }
    }
}

fn classify_hyper_source(err: &client::Error, err_msg: &str) -> Option<ClientError> {
    let hyper_err = source_err::<hyper::Error>(err)?;
    let err_msg = format!("{hyper_err} -> {err_msg}");
    if hyper_err.is_incomplete_message() {
        Some(ClientError::ConnectionClosedEarly(err_msg))
    } else if hyper_err.is_canceled() {
        Some(ClientError::RequestCanceled(err_msg))
    } else {
        None
    }
}

fn classify_io_source(err: &client::Error, err_msg: &str) -> Option<ClientError> {
    let io_err = source_err::<std::io::Error>(err)?;
    let err_msg = format!("{io_err} -> {err_msg}");
    Some(match io_err.kind() {
        std::io::ErrorKind::UnexpectedEof => ClientError::UnexpectedEof(err_msg),
        std::io::ErrorKind::ConnectionReset => ClientError::ConnectionReset(err_msg),
        std::io::ErrorKind::ConnectionAborted => ClientError::ConnectionAborted(err_msg),
        std::io::ErrorKind::ConnectionRefused => ClientError::ConnectionRefused(err_msg),
        _ => return None,
    })
}

fn source_err<T: std::error::Error + 'static>(err: &dyn std::error::Error) -> Option<&T> {
    let mut source = err.source();

    while let Some(err) = source {
        if let Some(err) = err.downcast_ref::<T>() {
            return Some(err);
        }

        source = err.source();
    }
    None
}

trait UnaryResult {
    fn into_result(self) -> Result<UnaryResponse, ApiError>;
}

impl UnaryResult for UnaryResponse {
    fn into_result(self) -> Result<UnaryResponse, ApiError> {
        let status = self.status();
        if status.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Server(
                status,
                codec::decode_error(status, self.headers(), self.body()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::auth::Credentials;
    use crate::client::Request;

    #[test]
    fn operation_table() {
        assert_eq!(OPERATIONS.len(), 13);

        let names = OPERATIONS.iter().map(|op| op.name).collect::<HashSet<_>>();
        assert_eq!(names.len(), OPERATIONS.len());

        for op in OPERATIONS {
            assert_eq!(op.method, Method::POST);
            assert_eq!(op.path, "/");
        }

        let without_output = OPERATIONS
            .iter()
            .filter(|op| !op.has_output)
            .map(|op| op.name)
            .collect::<HashSet<_>>();
        assert_eq!(
            without_output,
            HashSet::from([
                "AddTagsToStream",
                "CreateStream",
                "DeleteStream",
                "MergeShards",
                "RemoveTagsFromStream",
                "SplitShard",
            ])
        );
    }

    #[test]
    fn target_header() {
        assert_eq!(PutRecords::OPERATION.target(), "Kinesis_20131202.PutRecords");
    }

    struct Canned {
        requests: Mutex<Vec<Request>>,
        response: fn() -> Result<UnaryResponse, client::Error>,
    }

    #[async_trait]
    impl RequestExecutor for Canned {
        async fn execute_unary(&self, request: Request) -> Result<UnaryResponse, client::Error> {
            self.requests.lock().unwrap().push(request);
            (self.response)()
        }
    }

    fn json_client(
        response: fn() -> Result<UnaryResponse, client::Error>,
    ) -> (JsonClient, Arc<Canned>) {
        let executor = Arc::new(Canned {
            requests: Mutex::new(Vec::new()),
            response,
        });
        let config = KinesisConfig::new(Credentials::new("AKID", "secret"), "us-west-2").unwrap();
        let client = JsonClient::init_with_executor(&config, executor.clone()).unwrap();
        (client, executor)
    }

    #[tokio::test]
    async fn invoke_sends_one_protocol_request() {
        let (client, executor) = json_client(|| {
            Ok(UnaryResponse::new(
                StatusCode::OK,
                HeaderMap::new(),
                r#"{"StreamNames":["a"],"HasMoreStreams":false}"#,
            ))
        });

        let output = client
            .invoke::<ListStreams>(&ListStreamsInput::new().with_limit(1))
            .await
            .unwrap();
        assert_eq!(output.stream_names, vec!["a".to_owned()]);

        let requests = executor.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.uri().to_string(),
            "https://kinesis.us-west-2.amazonaws.com/"
        );
        assert_eq!(request.headers()[X_AMZ_TARGET], "Kinesis_20131202.ListStreams");
        assert_eq!(request.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(request.body(), &Bytes::from_static(br#"{"Limit":1}"#));
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let (client, _) = json_client(|| {
            Ok(UnaryResponse::new(
                StatusCode::BAD_REQUEST,
                HeaderMap::new(),
                r#"{"__type":"ResourceNotFoundException","message":"Stream s1 not found"}"#,
            ))
        });

        let err = client
            .invoke::<DeleteStream>(&DeleteStreamInput::new("s1"))
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::Server(StatusCode::BAD_REQUEST, response) => {
            assert_eq!(response.code, "ResourceNotFoundException");
            assert_eq!(response.message, "Stream s1 not found");
        });
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let (client, _) = json_client(|| {
            Ok(UnaryResponse::new(StatusCode::OK, HeaderMap::new(), "not json"))
        });

        let err = client
            .invoke::<GetShardIterator>(&GetShardIteratorInput::new(
                "s1",
                "shardId-0",
                crate::types::ShardIteratorType::Latest,
            ))
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::Codec(CodecError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failures_are_classified() {
        let (client, executor) = json_client(|| Err(client::Error::Timeout));

        let err = client
            .invoke::<CreateStream>(&CreateStreamInput::new("s1", 1))
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::Client(ClientError::Timeout));
        assert_eq!(executor.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn executor_failures_are_not_retryable() {
        let err = ClientError::from(client::Error::Other("boom".into()));
        assert_matches!(err, ClientError::Others(_));
        assert!(!err.is_retryable());
        assert!(ClientError::Timeout.is_retryable());
    }

    #[tokio::test]
    async fn refused_connection_is_classified() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let pool = client::Pool::new(
            client::default_connector(Some(Duration::from_secs(1))),
            Duration::from_secs(5),
        );
        let request = http::Request::post(format!("http://127.0.0.1:{port}/"))
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let err = ClientError::from(pool.execute_unary(request).await.unwrap_err());
        assert_matches!(
            err,
            ClientError::ConnectionRefused(_) | ClientError::Connect(_)
        );
        assert!(err.is_retryable());
    }
}
