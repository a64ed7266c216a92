mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{CensusError, Result};
use reqwest::Url;
use tracing::debug;

/// Issues a GET for `url` and returns the body.
///
/// # Errors
///
/// Returns [`CensusError::Fetch`] if the server answers with a non-success
/// status, or [`CensusError::Http`] if the request itself fails.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: Url) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CensusError::Fetch {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(%url, bytes = bytes.len(), "Response body received");
    Ok(bytes)
}
