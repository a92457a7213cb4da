//! Zone link discovery.
//!
//! The CZDS API exposes one listing endpoint that returns every zone file
//! URL the authenticated account may download, as a JSON array of strings.
//! The order of that array is preserved all the way to the worker queue.

use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

use crate::error::{Error, Result};

/// Default base URL of the CZDS API.
pub const DEFAULT_API_BASE_URL: &str = "https://czds-api.icann.org";

/// Default base URL for direct zone file downloads.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://czds-download-api.icann.org";

/// Fetch the download links for every approved zone.
///
/// Links are returned in the order the server lists them. Any failure is an
/// [`Error::ListingFailure`].
pub async fn zone_links(client: &ClientWithMiddleware, api_base: &str) -> Result<Vec<String>> {
    let url = format!("{}/czds/downloads/links", api_base.trim_end_matches('/'));
    debug!("Listing zone links from {url}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::ListingFailure(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::ListingFailure(format!(
            "\"{url}\" answered {status}"
        )));
    }

    let links: Vec<String> = response
        .json()
        .await
        .map_err(|e| Error::ListingFailure(format!("unreadable link list: {e}")))?;

    debug!("Listed {} zone link(s)", links.len());
    Ok(links)
}

/// Build the download link for a single zone.
pub fn single_zone_link(download_base: &str, zone: &str) -> String {
    format!(
        "{}/czds/downloads/{}.zone",
        download_base.trim_end_matches('/'),
        zone
    )
}

/// Derive the zone name from a download link.
///
/// Takes the last path segment, percent-decodes it, and strips the `.zone`
/// suffix the API appends, so `https://.../czds/downloads/com.zone` names
/// the zone `com`.
pub fn zone_name(url: &Url) -> Result<String> {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| {
            Error::InvalidUrl(format!("The url \"{url}\" does not name a zone file"))
        })?;

    let decoded: String = form_urlencoded::parse(segment.as_bytes())
        .map(|(key, val)| [key, val].concat())
        .collect();

    Ok(decoded
        .strip_suffix(".zone")
        .map(String::from)
        .unwrap_or(decoded))
}
