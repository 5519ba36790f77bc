//! Credentials and AWS Signature Version 4 request signing.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use http::{
    HeaderMap, HeaderValue, Uri,
    header::{AUTHORIZATION, HOST, InvalidHeaderValue, USER_AGENT},
};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use time::{OffsetDateTime, UtcOffset, macros::format_description};

use crate::client::Request;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

type HmacSha256 = Hmac<Sha256>;

/// AWS credentials used to sign every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: SecretString,
    pub(crate) session_token: Option<SecretString>,
}

impl Credentials {
    /// Create long-term credentials from an access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into().into(),
            session_token: None,
        }
    }

    /// Set the session token for temporary credentials.
    pub fn with_session_token(self, session_token: impl Into<String>) -> Self {
        Self {
            session_token: Some(session_token.into().into()),
            ..self
        }
    }

    /// Access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SigningError {
    #[error("request uri has no authority")]
    MissingAuthority,
    #[error("header `{0}` is not visible ascii")]
    NonAsciiHeader(String),
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
    #[error(transparent)]
    Format(#[from] time::error::Format),
}

/// Signs requests for one service name and region.
#[derive(Debug, Clone)]
pub(crate) struct Signer {
    service: String,
    region: String,
}

impl Signer {
    pub(crate) fn new(service: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Adds `Host`, `X-Amz-Date`, the optional security token and the
    /// `Authorization` header to the request.
    pub(crate) fn sign(
        &self,
        request: &mut Request,
        credentials: &Credentials,
        now: OffsetDateTime,
    ) -> Result<(), SigningError> {
        let authority = request
            .uri()
            .authority()
            .ok_or(SigningError::MissingAuthority)?
            .to_string();
        let amz_date = now.to_offset(UtcOffset::UTC).format(format_description!(
            "[year][month][day]T[hour][minute][second]Z"
        ))?;
        let date = &amz_date[..8];

        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        headers.insert(HOST, HeaderValue::from_str(&authority)?);
        headers.insert(X_AMZ_DATE, HeaderValue::from_str(&amz_date)?);
        if let Some(token) = &credentials.session_token {
            headers.insert(
                X_AMZ_SECURITY_TOKEN,
                HeaderValue::from_str(token.expose_secret())?,
            );
        }

        let (canonical_headers, signed_headers) = canonical_headers(request.headers())?;
        let canonical_request = format!(
            "{}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{}",
            request.method(),
            canonical_path(request.uri()),
            canonical_query(request.uri()),
            hex::encode(Sha256::digest(request.body())),
        );

        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let key = signing_key(
            credentials.secret_access_key.expose_secret(),
            date,
            &self.region,
            &self.service,
        );
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key_id
        );
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);

        Ok(())
    }
}

fn canonical_headers(headers: &HeaderMap) -> Result<(String, String), SigningError> {
    let mut canonical: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for name in headers.keys() {
        if *name == USER_AGENT || *name == AUTHORIZATION {
            continue;
        }
        let values = headers
            .get_all(name)
            .iter()
            .map(|value| {
                value
                    .to_str()
                    .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
                    .map_err(|_| SigningError::NonAsciiHeader(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        canonical.insert(name.as_str(), values);
    }

    let headers = canonical
        .iter()
        .map(|(name, values)| format!("{name}:{}\n", values.join(",")))
        .collect::<String>();
    let signed = canonical.keys().copied().collect::<Vec<_>>().join(";");
    Ok((headers, signed))
}

fn canonical_path(uri: &Uri) -> &str {
    match uri.path() {
        "" => "/",
        path => path,
    }
}

fn canonical_query(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return String::new();
    };
    let mut pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts keys of any length");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}
