//! Types relevant to [`Kinesis`](crate::Kinesis).
//!
//! Inputs are built with `new` plus `with_*` setters. Outputs mirror the
//! service's JSON documents: fields missing from a response take their
//! default value and unknown fields are ignored.
use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

use bytes::Bytes;
use http::{HeaderValue, StatusCode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    api::ApiError,
    auth::Credentials,
    codec::{blob, null_default},
    endpoints::{self, ResolvedEndpoint},
};

pub(crate) const SERVICE_NAME: &str = "kinesis";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
/// Validation error.
pub struct ValidationError(pub String);

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ValidationError {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
/// Configuration for [`Kinesis`](crate::Kinesis).
pub struct KinesisConfig {
    pub(crate) credentials: Credentials,
    pub(crate) endpoint: ResolvedEndpoint,
    pub(crate) connection_timeout: Duration,
    pub(crate) request_timeout: Duration,
    pub(crate) user_agent: HeaderValue,
}

impl KinesisConfig {
    /// Create a new [`KinesisConfig`] for `region` with default settings.
    ///
    /// The endpoint is resolved with [`endpoints::resolve`].
    pub fn new(credentials: Credentials, region: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            credentials,
            endpoint: endpoints::resolve(SERVICE_NAME, region.as_ref())?,
            connection_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
            user_agent: HeaderValue::from_static("kinesis-sdk-rust"),
        })
    }

    /// Send requests to `url` instead of the regional endpoint.
    ///
    /// Only the scheme, host and port are used, so `url` must not carry a
    /// path, query or fragment. The signing scope keeps the configured region.
    pub fn with_endpoint(self, url: impl AsRef<str>) -> Result<Self, ValidationError> {
        let url = url::Url::parse(url.as_ref())
            .map_err(|e| ValidationError(format!("invalid endpoint url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(format!("endpoint must be an http(s) url with a host: {url}").into());
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(format!("endpoint must not have a path, query or fragment: {url}").into());
        }
        Ok(Self {
            endpoint: ResolvedEndpoint { url, ..self.endpoint },
            ..self
        })
    }

    /// Set the timeout for establishing a connection to the server.
    ///
    /// Defaults to `3s`.
    pub fn with_connection_timeout(self, connection_timeout: Duration) -> Self {
        Self {
            connection_timeout,
            ..self
        }
    }

    /// Set the timeout for a single request/response exchange.
    ///
    /// Defaults to `5s`.
    pub fn with_request_timeout(self, request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            ..self
        }
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(self, user_agent: impl AsRef<str>) -> Result<Self, ValidationError> {
        let user_agent = HeaderValue::from_str(user_agent.as_ref())
            .map_err(|e| ValidationError(format!("invalid user agent: {e}")))?;
        Ok(Self { user_agent, ..self })
    }

    /// Endpoint that requests are sent to.
    pub fn endpoint(&self) -> &ResolvedEndpoint {
        &self.endpoint
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
/// Current status of a stream.
pub enum StreamStatus {
    /// The stream is being created.
    Creating,
    /// The stream exists and is ready for read and write operations.
    Active,
    /// The stream is being deleted.
    Deleting,
    /// Shards in the stream are being merged or split.
    Updating,
    /// No status was reported.
    #[default]
    Unknown,
    /// A status this client does not know about.
    Other(String),
}

impl StreamStatus {
    const CREATING: &'static str = "CREATING";
    const ACTIVE: &'static str = "ACTIVE";
    const DELETING: &'static str = "DELETING";
    const UPDATING: &'static str = "UPDATING";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => Self::CREATING,
            Self::Active => Self::ACTIVE,
            Self::Deleting => Self::DELETING,
            Self::Updating => Self::UPDATING,
            Self::Unknown => "",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for StreamStatus {
    fn from(s: &str) -> Self {
        match s {
            Self::CREATING => Self::Creating,
            Self::ACTIVE => Self::Active,
            Self::DELETING => Self::Deleting,
            Self::UPDATING => Self::Updating,
            "" => Self::Unknown,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StreamStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StreamStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.as_deref().map(Self::from).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Position in a shard that a shard iterator starts from.
pub enum ShardIteratorType {
    /// At the record with
    /// [`starting_sequence_number`](GetShardIteratorInput::starting_sequence_number).
    AtSequenceNumber,
    /// Right after the record with
    /// [`starting_sequence_number`](GetShardIteratorInput::starting_sequence_number).
    AfterSequenceNumber,
    /// At the oldest untrimmed record in the shard.
    TrimHorizon,
    /// Just after the most recent record in the shard.
    Latest,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Error code reported by the service.
///
/// Codes this client does not know about are kept in [`ErrorCode::Other`].
pub enum ErrorCode {
    /// The requested resource could not be found.
    ResourceNotFound,
    /// The resource is not available for this operation, e.g. the stream is
    /// not `ACTIVE`.
    ResourceInUse,
    /// A limit was exceeded, such as the number of concurrent stream
    /// operations.
    LimitExceeded,
    /// The request rate for the stream or shard is too high.
    ProvisionedThroughputExceeded,
    /// A parameter is invalid.
    InvalidArgument,
    /// The shard iterator has expired.
    ExpiredIterator,
    /// The service failed to process the request.
    InternalFailure,
    /// The service is temporarily unable to handle the request.
    ServiceUnavailable,
    /// The request was throttled.
    Throttling,
    /// Access to the resource is denied.
    AccessDenied,
    /// The request did not pass input validation.
    Validation,
    /// The request body could not be deserialized.
    Serialization,
    /// The access key id is not recognized.
    UnrecognizedClient,
    /// The request signature does not conform to the expected format.
    IncompleteSignature,
    /// Any other code.
    Other(String),
}

impl ErrorCode {
    const RESOURCE_NOT_FOUND: &'static str = "ResourceNotFoundException";
    const RESOURCE_IN_USE: &'static str = "ResourceInUseException";
    const LIMIT_EXCEEDED: &'static str = "LimitExceededException";
    const PROVISIONED_THROUGHPUT_EXCEEDED: &'static str =
        "ProvisionedThroughputExceededException";
    const INVALID_ARGUMENT: &'static str = "InvalidArgumentException";
    const EXPIRED_ITERATOR: &'static str = "ExpiredIteratorException";
    const INTERNAL_FAILURE: &'static str = "InternalFailure";
    const SERVICE_UNAVAILABLE: &'static str = "ServiceUnavailable";
    const THROTTLING: &'static str = "ThrottlingException";
    const ACCESS_DENIED: &'static str = "AccessDeniedException";
    const VALIDATION: &'static str = "ValidationException";
    const SERIALIZATION: &'static str = "SerializationException";
    const UNRECOGNIZED_CLIENT: &'static str = "UnrecognizedClientException";
    const INCOMPLETE_SIGNATURE: &'static str = "IncompleteSignature";

    /// Wire representation of this code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ResourceNotFound => Self::RESOURCE_NOT_FOUND,
            Self::ResourceInUse => Self::RESOURCE_IN_USE,
            Self::LimitExceeded => Self::LIMIT_EXCEEDED,
            Self::ProvisionedThroughputExceeded => Self::PROVISIONED_THROUGHPUT_EXCEEDED,
            Self::InvalidArgument => Self::INVALID_ARGUMENT,
            Self::ExpiredIterator => Self::EXPIRED_ITERATOR,
            Self::InternalFailure => Self::INTERNAL_FAILURE,
            Self::ServiceUnavailable => Self::SERVICE_UNAVAILABLE,
            Self::Throttling => Self::THROTTLING,
            Self::AccessDenied => Self::ACCESS_DENIED,
            Self::Validation => Self::VALIDATION,
            Self::Serialization => Self::SERIALIZATION,
            Self::UnrecognizedClient => Self::UNRECOGNIZED_CLIENT,
            Self::IncompleteSignature => Self::INCOMPLETE_SIGNATURE,
            Self::Other(code) => code,
        }
    }

    /// Whether the code signals throttling or a transient server fault, so
    /// that the same request may succeed after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceeded
                | Self::LimitExceeded
                | Self::Throttling
                | Self::InternalFailure
                | Self::ServiceUnavailable
        )
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        match s {
            Self::RESOURCE_NOT_FOUND => Self::ResourceNotFound,
            Self::RESOURCE_IN_USE => Self::ResourceInUse,
            Self::LIMIT_EXCEEDED => Self::LimitExceeded,
            Self::PROVISIONED_THROUGHPUT_EXCEEDED => Self::ProvisionedThroughputExceeded,
            Self::INVALID_ARGUMENT => Self::InvalidArgument,
            Self::EXPIRED_ITERATOR => Self::ExpiredIterator,
            Self::INTERNAL_FAILURE => Self::InternalFailure,
            Self::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            Self::THROTTLING => Self::Throttling,
            Self::ACCESS_DENIED => Self::AccessDenied,
            Self::VALIDATION => Self::Validation,
            Self::SERIALIZATION => Self::Serialization,
            Self::UNRECOGNIZED_CLIENT => Self::UnrecognizedClient,
            Self::INCOMPLETE_SIGNATURE => Self::IncompleteSignature,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl FromStr for ErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.as_str().into())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`add_tags_to_stream`](crate::Kinesis::add_tags_to_stream).
pub struct AddTagsToStreamInput {
    /// Stream to tag.
    pub stream_name: String,
    /// Tags to set. Existing tags with the same keys are overwritten.
    pub tags: HashMap<String, String>,
}

impl AddTagsToStreamInput {
    /// Create a new [`AddTagsToStreamInput`] without any tags.
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            tags: HashMap::new(),
        }
    }

    /// Add a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replace the tags.
    pub fn with_tags(self, tags: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`create_stream`](crate::Kinesis::create_stream).
pub struct CreateStreamInput {
    /// Number of shards the stream starts with.
    pub shard_count: u32,
    /// Name of the stream, unique to the account and region.
    pub stream_name: String,
}

impl CreateStreamInput {
    /// Create a new [`CreateStreamInput`].
    pub fn new(stream_name: impl Into<String>, shard_count: u32) -> Self {
        Self {
            shard_count,
            stream_name: stream_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`delete_stream`](crate::Kinesis::delete_stream).
pub struct DeleteStreamInput {
    /// Stream to delete.
    pub stream_name: String,
}

impl DeleteStreamInput {
    /// Create a new [`DeleteStreamInput`].
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`describe_stream`](crate::Kinesis::describe_stream).
pub struct DescribeStreamInput {
    /// Shard id after which to start listing shards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_shard_id: Option<String>,
    /// Maximum number of shards to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Stream to describe.
    pub stream_name: String,
}

impl DescribeStreamInput {
    /// Create a new [`DescribeStreamInput`].
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            exclusive_start_shard_id: None,
            limit: None,
            stream_name: stream_name.into(),
        }
    }

    /// Set the shard id after which to start listing shards.
    pub fn with_exclusive_start_shard_id(self, shard_id: impl Into<String>) -> Self {
        Self {
            exclusive_start_shard_id: Some(shard_id.into()),
            ..self
        }
    }

    /// Set the maximum number of shards to return.
    pub fn with_limit(self, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`describe_stream`](crate::Kinesis::describe_stream).
pub struct DescribeStreamOutput {
    #[serde(deserialize_with = "null_default")]
    pub stream_description: StreamDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Current state of a stream.
pub struct StreamDescription {
    /// Whether more shards are available beyond [`shards`](Self::shards).
    ///
    /// Request them with
    /// [`DescribeStreamInput::with_exclusive_start_shard_id`] set to the id
    /// of the last returned shard.
    #[serde(deserialize_with = "null_default")]
    pub has_more_shards: bool,
    /// Shards of the stream, in the order returned by the service.
    #[serde(deserialize_with = "null_default")]
    pub shards: Vec<Shard>,
    /// Amazon resource name of the stream.
    #[serde(rename = "StreamARN", deserialize_with = "null_default")]
    pub stream_arn: String,
    #[serde(deserialize_with = "null_default")]
    pub stream_name: String,
    pub stream_status: StreamStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// A uniquely identified group of records in a stream.
pub struct Shard {
    /// Id of the shard adjacent to the parent, if this shard was created by a
    /// merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjacent_parent_shard_id: Option<String>,
    /// Range of partition key hashes owned by this shard.
    #[serde(deserialize_with = "null_default")]
    pub hash_key_range: HashKeyRange,
    /// Id of the shard this shard was split or merged from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shard_id: Option<String>,
    /// Range of sequence numbers in this shard.
    #[serde(deserialize_with = "null_default")]
    pub sequence_number_range: SequenceNumberRange,
    #[serde(rename = "ShardId", deserialize_with = "null_default")]
    pub shard_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Inclusive range of 128-bit hash keys, as decimal strings.
pub struct HashKeyRange {
    #[serde(deserialize_with = "null_default")]
    pub ending_hash_key: String,
    #[serde(deserialize_with = "null_default")]
    pub starting_hash_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Range of sequence numbers in a shard.
pub struct SequenceNumberRange {
    /// Last sequence number, present only once the shard is closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_sequence_number: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub starting_sequence_number: String,
}

impl SequenceNumberRange {
    /// Whether the shard still accepts records, as last reported by the service.
    pub fn is_open(&self) -> bool {
        self.ending_sequence_number.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`get_records`](crate::Kinesis::get_records).
pub struct GetRecordsInput {
    /// Maximum number of records to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Iterator to read from.
    pub shard_iterator: String,
}

impl GetRecordsInput {
    /// Create a new [`GetRecordsInput`].
    pub fn new(shard_iterator: impl Into<String>) -> Self {
        Self {
            limit: None,
            shard_iterator: shard_iterator.into(),
        }
    }

    /// Set the maximum number of records to return.
    pub fn with_limit(self, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`get_records`](crate::Kinesis::get_records).
pub struct GetRecordsOutput {
    /// Iterator to pass to the next [`get_records`](crate::Kinesis::get_records)
    /// call. Absent once the shard is closed and fully read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_shard_iterator: Option<String>,
    /// Records in shard order. May be empty even if more records follow.
    #[serde(deserialize_with = "null_default")]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// A record read from a shard.
pub struct Record {
    /// Payload of the record.
    #[serde(with = "blob")]
    pub data: Bytes,
    #[serde(deserialize_with = "null_default")]
    pub partition_key: String,
    #[serde(deserialize_with = "null_default")]
    pub sequence_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`get_shard_iterator`](crate::Kinesis::get_shard_iterator).
pub struct GetShardIteratorInput {
    #[serde(rename = "ShardId")]
    pub shard_id: String,
    pub shard_iterator_type: ShardIteratorType,
    /// Required for [`ShardIteratorType::AtSequenceNumber`] and
    /// [`ShardIteratorType::AfterSequenceNumber`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_sequence_number: Option<String>,
    pub stream_name: String,
}

impl GetShardIteratorInput {
    /// Create a new [`GetShardIteratorInput`].
    pub fn new(
        stream_name: impl Into<String>,
        shard_id: impl Into<String>,
        shard_iterator_type: ShardIteratorType,
    ) -> Self {
        Self {
            shard_id: shard_id.into(),
            shard_iterator_type,
            starting_sequence_number: None,
            stream_name: stream_name.into(),
        }
    }

    /// Set the sequence number the iterator is positioned relative to.
    pub fn with_starting_sequence_number(self, sequence_number: impl Into<String>) -> Self {
        Self {
            starting_sequence_number: Some(sequence_number.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`get_shard_iterator`](crate::Kinesis::get_shard_iterator).
pub struct GetShardIteratorOutput {
    /// Iterator, valid for five minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_iterator: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`list_streams`](crate::Kinesis::list_streams).
pub struct ListStreamsInput {
    /// Stream name after which to start listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_stream_name: Option<String>,
    /// Maximum number of stream names to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListStreamsInput {
    /// Create a new [`ListStreamsInput`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stream name after which to start listing.
    pub fn with_exclusive_start_stream_name(self, stream_name: impl Into<String>) -> Self {
        Self {
            exclusive_start_stream_name: Some(stream_name.into()),
            ..self
        }
    }

    /// Set the maximum number of stream names to return.
    pub fn with_limit(self, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`list_streams`](crate::Kinesis::list_streams).
pub struct ListStreamsOutput {
    /// Whether more stream names are available. The client does not fetch
    /// them on its own.
    #[serde(deserialize_with = "null_default")]
    pub has_more_streams: bool,
    #[serde(deserialize_with = "null_default")]
    pub stream_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`list_tags_for_stream`](crate::Kinesis::list_tags_for_stream).
pub struct ListTagsForStreamInput {
    /// Tag key after which to start listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_tag_key: Option<String>,
    /// Maximum number of tags to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub stream_name: String,
}

impl ListTagsForStreamInput {
    /// Create a new [`ListTagsForStreamInput`].
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            exclusive_start_tag_key: None,
            limit: None,
            stream_name: stream_name.into(),
        }
    }

    /// Set the tag key after which to start listing.
    pub fn with_exclusive_start_tag_key(self, key: impl Into<String>) -> Self {
        Self {
            exclusive_start_tag_key: Some(key.into()),
            ..self
        }
    }

    /// Set the maximum number of tags to return.
    pub fn with_limit(self, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`list_tags_for_stream`](crate::Kinesis::list_tags_for_stream).
pub struct ListTagsForStreamOutput {
    #[serde(deserialize_with = "null_default")]
    pub has_more_tags: bool,
    #[serde(deserialize_with = "null_default")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// A stream tag.
pub struct Tag {
    #[serde(deserialize_with = "null_default")]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`merge_shards`](crate::Kinesis::merge_shards).
pub struct MergeShardsInput {
    /// Shard adjacent to [`shard_to_merge`](Self::shard_to_merge).
    pub adjacent_shard_to_merge: String,
    pub shard_to_merge: String,
    pub stream_name: String,
}

impl MergeShardsInput {
    /// Create a new [`MergeShardsInput`].
    pub fn new(
        stream_name: impl Into<String>,
        shard_to_merge: impl Into<String>,
        adjacent_shard_to_merge: impl Into<String>,
    ) -> Self {
        Self {
            adjacent_shard_to_merge: adjacent_shard_to_merge.into(),
            shard_to_merge: shard_to_merge.into(),
            stream_name: stream_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`put_record`](crate::Kinesis::put_record).
pub struct PutRecordInput {
    /// Payload of the record.
    #[serde(with = "blob")]
    pub data: Bytes,
    /// Hash key that overrides the partition key hash for shard selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_hash_key: Option<String>,
    /// Key hashed to select the shard.
    pub partition_key: String,
    /// Sequence number of a previous record from the same producer, to
    /// order records within a partition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number_for_ordering: Option<String>,
    pub stream_name: String,
}

impl PutRecordInput {
    /// Create a new [`PutRecordInput`].
    pub fn new(
        stream_name: impl Into<String>,
        data: impl Into<Bytes>,
        partition_key: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            explicit_hash_key: None,
            partition_key: partition_key.into(),
            sequence_number_for_ordering: None,
            stream_name: stream_name.into(),
        }
    }

    /// Set the explicit hash key.
    pub fn with_explicit_hash_key(self, explicit_hash_key: impl Into<String>) -> Self {
        Self {
            explicit_hash_key: Some(explicit_hash_key.into()),
            ..self
        }
    }

    /// Set the sequence number for ordering.
    pub fn with_sequence_number_for_ordering(self, sequence_number: impl Into<String>) -> Self {
        Self {
            sequence_number_for_ordering: Some(sequence_number.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`put_record`](crate::Kinesis::put_record).
pub struct PutRecordOutput {
    #[serde(deserialize_with = "null_default")]
    pub sequence_number: String,
    #[serde(rename = "ShardId", deserialize_with = "null_default")]
    pub shard_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`put_records`](crate::Kinesis::put_records).
pub struct PutRecordsInput {
    pub records: Vec<PutRecordsRequestEntry>,
    pub stream_name: String,
}

impl PutRecordsInput {
    /// Create a new [`PutRecordsInput`].
    pub fn new(
        stream_name: impl Into<String>,
        records: impl IntoIterator<Item = PutRecordsRequestEntry>,
    ) -> Self {
        Self {
            records: records.into_iter().collect(),
            stream_name: stream_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// A record in a [`PutRecordsInput`].
pub struct PutRecordsRequestEntry {
    #[serde(with = "blob")]
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_hash_key: Option<String>,
    pub partition_key: String,
}

impl PutRecordsRequestEntry {
    /// Create a new [`PutRecordsRequestEntry`].
    pub fn new(data: impl Into<Bytes>, partition_key: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            explicit_hash_key: None,
            partition_key: partition_key.into(),
        }
    }

    /// Set the explicit hash key.
    pub fn with_explicit_hash_key(self, explicit_hash_key: impl Into<String>) -> Self {
        Self {
            explicit_hash_key: Some(explicit_hash_key.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Output of [`put_records`](crate::Kinesis::put_records).
///
/// A batch can partially succeed. [`records`](Self::records) has one entry
/// per input record, in input order.
pub struct PutRecordsOutput {
    /// Number of records that were not written.
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(deserialize_with = "null_default")]
    pub failed_record_count: u32,
    #[serde(deserialize_with = "null_default")]
    pub records: Vec<PutRecordsResultEntry>,
}

impl PutRecordsOutput {
    /// Entries that failed, with their position in the input.
    pub fn failed_records(&self) -> impl Iterator<Item = (usize, &PutRecordsResultEntry)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_failure())
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[non_exhaustive]
/// Outcome for one record of a [`PutRecordsInput`].
///
/// Either `sequence_number` and `shard_id` are set, or `error_code` and
/// `error_message`.
pub struct PutRecordsResultEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(rename = "ShardId", skip_serializing_if = "Option::is_none")]
    pub shard_id: Option<String>,
}

impl PutRecordsResultEntry {
    /// Whether this record was not written.
    pub fn is_failure(&self) -> bool {
        self.error_code.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`remove_tags_from_stream`](crate::Kinesis::remove_tags_from_stream).
pub struct RemoveTagsFromStreamInput {
    pub stream_name: String,
    pub tag_keys: Vec<String>,
}

impl RemoveTagsFromStreamInput {
    /// Create a new [`RemoveTagsFromStreamInput`].
    pub fn new(
        stream_name: impl Into<String>,
        tag_keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            stream_name: stream_name.into(),
            tag_keys: tag_keys.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
/// Input for [`split_shard`](crate::Kinesis::split_shard).
pub struct SplitShardInput {
    /// Hash key that becomes the starting hash key of the new child shard.
    pub new_starting_hash_key: String,
    pub shard_to_split: String,
    pub stream_name: String,
}

impl SplitShardInput {
    /// Create a new [`SplitShardInput`].
    pub fn new(
        stream_name: impl Into<String>,
        shard_to_split: impl Into<String>,
        new_starting_hash_key: impl Into<String>,
    ) -> Self {
        Self {
            new_starting_hash_key: new_starting_hash_key.into(),
            shard_to_split: shard_to_split.into(),
            stream_name: stream_name.into(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
/// Errors from [`Kinesis`](crate::Kinesis) operations.
pub enum KinesisError {
    #[error("transport: {message}")]
    /// The request could not be delivered or the response not received.
    Transport {
        message: String,
        /// Whether the failure is transient, e.g. a reset connection or a
        /// timeout.
        retryable: bool,
    },
    #[error("{0}")]
    /// Client-side error while building a request or reading a response.
    Client(String),
    #[error(transparent)]
    /// Validation error.
    Validation(#[from] ValidationError),
    #[error("{0}")]
    /// Error returned by the service.
    Service(ServiceError),
}

impl KinesisError {
    /// Whether the same request may succeed if sent again after a backoff.
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::Service(err) => err.is_retryable(),
            Self::Client(_) | Self::Validation(_) => false,
        }
    }

    /// Service error, if this is one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }

    /// Service error code, if this is a service error.
    pub fn code(&self) -> Option<&ErrorCode> {
        self.service_error().map(|err| &err.code)
    }
}

impl From<ApiError> for KinesisError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server(status, response) => Self::Service(ServiceError {
                code: response.code.as_str().into(),
                message: response.message,
                status,
                request_id: response.request_id,
            }),
            ApiError::Client(err) => Self::Transport {
                retryable: err.is_retryable(),
                message: err.to_string(),
            },
            other => Self::Client(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Error response from the service.
pub struct ServiceError {
    /// Error code. [`ErrorCode::Other`] with an empty string if the response
    /// carried none.
    pub code: ErrorCode,
    pub message: String,
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Request id assigned by the service, useful when contacting support.
    pub request_id: Option<String>,
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable() || self.status.is_server_error()
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.as_str().is_empty() {
            write!(f, "{} ({})", self.message, self.status)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}
