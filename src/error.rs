use reqwest::StatusCode;
use thiserror::Error;

/// Failures that can occur while fetching or decoding weather data.
///
/// Provider operations return these wrapped in `anyhow` context naming the
/// operation and dataset; the variants stay reachable via downcast.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200 OK.
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// The payload was not a valid gzip stream.
    #[error("invalid gzip stream")]
    Decompress(#[source] std::io::Error),

    /// The snapshot XML did not match the expected layout.
    #[error("malformed XML snapshot")]
    Xml(#[from] serde_xml_rs::Error),

    /// The station API response did not match the expected layout.
    #[error("malformed JSON response")]
    Json(#[from] serde_json::Error),

    /// The station API returned a well-formed but empty result set.
    #[error("no reports available for station {station}")]
    NoData { station: String },

    /// A request URL could not be built from the configured API root.
    #[error("invalid request URL {url}: {reason}")]
    Url { url: String, reason: String },
}
