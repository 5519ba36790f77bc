//! Regional endpoint resolution.

use url::Url;

use crate::types::ValidationError;

/// Endpoint resolved for a service in a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// Base URL that requests are sent to.
    pub url: Url,
    /// Service name used in the signing scope.
    pub signing_name: String,
    /// Region used in the signing scope.
    pub signing_region: String,
}

/// Resolve the endpoint for `service` in `region`.
///
/// Regions in the China partition use the `amazonaws.com.cn` domain; every
/// other region uses `amazonaws.com`.
pub fn resolve(service: &str, region: &str) -> Result<ResolvedEndpoint, ValidationError> {
    if region.is_empty()
        || !region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(format!("invalid region: {region:?}").into());
    }

    let domain = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    let url = Url::parse(&format!("https://{service}.{region}.{domain}/"))
        .map_err(|e| ValidationError(format!("invalid endpoint for {region:?}: {e}")))?;

    Ok(ResolvedEndpoint {
        url,
        signing_name: service.to_owned(),
        signing_region: region.to_owned(),
    })
}
