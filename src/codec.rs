//! JSON wire codec for the `x-amz-json-1.1` protocol.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{
    api::ApiErrorResponse,
    types::{
        DescribeStreamOutput, GetRecordsOutput, GetShardIteratorOutput, ListStreamsOutput,
        ListTagsForStreamOutput, PutRecordOutput, PutRecordsOutput,
    },
};

const REQUEST_ID_HEADER: &str = "x-amzn-requestid";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Bytes, CodecError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(CodecError::Encode)
}

/// Decodes a success body. An empty body decodes like `{}`.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError> {
    let body = if body.trim_ascii().is_empty() {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(CodecError::Decode)
}

/// Typed decoding of a success response body.
pub(crate) trait Decode: Sized {
    const HAS_PAYLOAD: bool = true;

    fn decode(body: &[u8]) -> Result<Self, CodecError>;
}

/// Operations without a response payload ignore the body.
impl Decode for () {
    const HAS_PAYLOAD: bool = false;

    fn decode(_body: &[u8]) -> Result<Self, CodecError> {
        Ok(())
    }
}

macro_rules! json_decode {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode(body: &[u8]) -> Result<Self, CodecError> {
                    decode(body)
                }
            }
        )*
    };
}

json_decode!(
    DescribeStreamOutput,
    GetRecordsOutput,
    GetShardIteratorOutput,
    ListStreamsOutput,
    ListTagsForStreamOutput,
    PutRecordOutput,
    PutRecordsOutput,
);

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "Message", default)]
    message_upper: Option<String>,
}

/// Decodes a failure body into the service's structured error.
///
/// The code comes from `__type`, falling back to the `x-amzn-ErrorType`
/// header. If the body is empty or not JSON, the status text becomes the
/// message.
pub(crate) fn decode_error(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> ApiErrorResponse {
    let parsed = if body.trim_ascii().is_empty() {
        ErrorBody::default()
    } else {
        serde_json::from_slice::<ErrorBody>(body).unwrap_or_else(|e| {
            warn!(?e, %status, "failed to decode error response body");
            ErrorBody::default()
        })
    };

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    let code = parsed
        .error_type
        .or_else(|| header(ERROR_TYPE_HEADER))
        .map(|raw| sanitize_error_code(&raw).to_owned())
        .unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.message_upper)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_owned());

    ApiErrorResponse {
        code,
        message,
        request_id: header(REQUEST_ID_HEADER),
    }
}

/// `aws.protocol#ResourceNotFoundException:http://...` -> `ResourceNotFoundException`
fn sanitize_error_code(raw: &str) -> &str {
    let raw = raw.split(':').next().unwrap_or(raw);
    raw.rsplit('#').next().unwrap_or(raw)
}

/// Deserializes `null` like an absent field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Base64 (standard alphabet, padded) encoding of blob fields.
pub(crate) mod blob {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded)
                .map(Bytes::from)
                .map_err(D::Error::custom),
            None => Ok(Bytes::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::types::{PutRecordsRequestEntry, Record, StreamStatus};

    #[test]
    fn empty_success_body_decodes_to_defaults() {
        let output: ListStreamsOutput = decode(b"").unwrap();
        assert!(output.stream_names.is_empty());
        assert!(!output.has_more_streams);

        let output: GetShardIteratorOutput = decode(b"  \n").unwrap();
        assert_eq!(output.shard_iterator, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = json!({
            "StreamDescription": {
                "StreamName": "s1",
                "StreamStatus": "ACTIVE",
                "StreamARN": "arn:aws:kinesis:us-east-1:123456789012:stream/s1",
                "HasMoreShards": false,
                "Shards": [],
                "RetentionPeriodHours": 24,
                "EncryptionType": "NONE"
            },
            "SomethingNew": [1, 2, 3]
        });
        let output: DescribeStreamOutput = decode(body.to_string().as_bytes()).unwrap();
        assert_eq!(output.stream_description.stream_name, "s1");
        assert_eq!(output.stream_description.stream_status, StreamStatus::Active);
    }

    #[test]
    fn null_fields_decode_as_defaults() {
        let body = json!({
            "StreamDescription": {
                "StreamName": "s1",
                "StreamStatus": null,
                "StreamARN": null,
                "HasMoreShards": null,
                "Shards": null
            }
        });
        let output: DescribeStreamOutput = decode(body.to_string().as_bytes()).unwrap();
        let description = output.stream_description;
        assert_eq!(description.stream_name, "s1");
        assert_eq!(description.stream_arn, "");
        assert_eq!(description.stream_status, StreamStatus::Unknown);
        assert!(!description.has_more_shards);
        assert!(description.shards.is_empty());

        let output: ListStreamsOutput =
            decode(br#"{"HasMoreStreams":false,"StreamNames":null}"#).unwrap();
        assert!(output.stream_names.is_empty());

        let body = json!({
            "NextShardIterator": null,
            "Records": [{"Data": null, "PartitionKey": null, "SequenceNumber": "1"}]
        });
        let output: GetRecordsOutput = decode(body.to_string().as_bytes()).unwrap();
        assert_eq!(output.next_shard_iterator, None);
        assert!(output.records[0].data.is_empty());
        assert_eq!(output.records[0].partition_key, "");

        let output: DescribeStreamOutput = decode(br#"{"StreamDescription":null}"#).unwrap();
        assert_eq!(output, DescribeStreamOutput::default());
    }

    #[test]
    fn blob_round_trips_all_byte_values() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1024 * 1024).collect();
        let entry = PutRecordsRequestEntry::new(data.clone(), "k");

        let encoded = encode(&entry).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        let wire = value["Data"].as_str().unwrap().to_owned();

        let record: Record = decode(
            json!({"Data": wire, "PartitionKey": "k", "SequenceNumber": "1"})
                .to_string()
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(record.data.as_ref(), data.as_slice());
    }

    #[test]
    fn blob_uses_padded_standard_alphabet() {
        let entry = PutRecordsRequestEntry::new(vec![0xfb, 0xff], "k");
        let value: serde_json::Value = serde_json::from_slice(&encode(&entry).unwrap()).unwrap();
        assert_eq!(value["Data"], "+/8=");
    }

    #[test]
    fn invalid_blob_fails_to_decode() {
        let result = decode::<Record>(br#"{"Data": "not base64!", "PartitionKey": "k"}"#);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[rstest]
    #[case(
        r#"{"__type":"ResourceNotFoundException","message":"Stream missing not found"}"#,
        "ResourceNotFoundException",
        "Stream missing not found"
    )]
    #[case(
        r#"{"__type":"com.amazonaws.kinesis.v20131202#LimitExceededException","Message":"too many"}"#,
        "LimitExceededException",
        "too many"
    )]
    #[case(
        r#"{"__type":"InternalFailure:http://internal.amazon.com/coral/"}"#,
        "InternalFailure",
        "Bad Request"
    )]
    #[case("", "", "Bad Request")]
    #[case("<html>oops</html>", "", "Bad Request")]
    fn error_bodies(#[case] body: &str, #[case] code: &str, #[case] message: &str) {
        let response = decode_error(StatusCode::BAD_REQUEST, &HeaderMap::new(), body.as_bytes());
        assert_eq!(response.code, code);
        assert_eq!(response.message, message);
        assert_eq!(response.request_id, None);
    }

    #[test]
    fn error_body_with_both_message_spellings() {
        let body = br#"{"__type":"InvalidArgumentException","message":"lower","Message":"upper"}"#;
        let response = decode_error(StatusCode::BAD_REQUEST, &HeaderMap::new(), body);
        assert_eq!(response.code, "InvalidArgumentException");
        assert_eq!(response.message, "lower");
    }

    #[test]
    fn error_code_and_request_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-amzn-errortype",
            HeaderValue::from_static("ThrottlingException:http://internal.amazon.com/"),
        );
        headers.insert("x-amzn-requestid", HeaderValue::from_static("req-1"));

        let response = decode_error(StatusCode::SERVICE_UNAVAILABLE, &headers, b"");
        assert_eq!(response.code, "ThrottlingException");
        assert_eq!(response.message, "Service Unavailable");
        assert_eq!(response.request_id.as_deref(), Some("req-1"));
    }
}
