use ncov_stats::{parse_latest, CanonicalRecord, Fields};
use reqwest::Client;
use tracing::{debug, error};

use crate::FetchError;

/// Retrieves the newest statistics snapshot. Failures are logged and
/// returned as-is; nothing is retried.
pub async fn fetch_latest(
    client: &Client,
    endpoint: &str,
    fields: &Fields,
) -> Result<CanonicalRecord, FetchError> {
    request(client, endpoint, fields)
        .await
        .inspect_err(|err| error!(kind = ?err.kind(), endpoint, "{err}"))
}

async fn request(
    client: &Client,
    endpoint: &str,
    fields: &Fields,
) -> Result<CanonicalRecord, FetchError> {
    debug!(endpoint, "sending HTTP request");
    let response = client
        .get(endpoint)
        .send()
        .await
        .map_err(FetchError::Network)?;

    let status = response.status();
    if status.as_u16() > 299 {
        return Err(FetchError::BadStatus(status));
    }

    debug!(%status, "reading response body");
    let body = response.bytes().await.map_err(FetchError::Network)?;

    Ok(parse_latest(&body, fields)?)
}
