use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info};

use crate::{error::Error, model::StationMap};

use super::WeatherProvider;

const DEFAULT_METAR_CACHE: &str = "https://aviationweather.gov/data/cache/metars.cache.xml.gz";
const DEFAULT_TAF_CACHE: &str = "https://aviationweather.gov/data/cache/tafs.cache.xml.gz";
const DEFAULT_API_ROOT: &str = "https://aviationweather.gov/api/data";

/// A snapshot download can run to several megabytes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Weather provider backed by the NWS Aviation Weather Center.
///
/// Bulk updates read the gzipped XML cache files covering all stations;
/// single-station lookups go through the JSON data API. The provider holds
/// only its endpoint URLs and a shared HTTP client, so one instance can be
/// used from multiple tasks.
#[derive(Debug, Clone)]
pub struct NwsProvider {
    metar_cache_url: String,
    taf_cache_url: String,
    api_root_url: String,
    http: Client,
}

impl NwsProvider {
    /// Provider pointed at the production aviationweather.gov endpoints.
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_METAR_CACHE, DEFAULT_TAF_CACHE, DEFAULT_API_ROOT)
    }

    /// Provider with overridden endpoints, for tests or alternate
    /// deployments. Endpoints are fixed for the life of the provider.
    pub fn with_endpoints(
        metar_cache_url: impl Into<String>,
        taf_cache_url: impl Into<String>,
        api_root_url: impl Into<String>,
    ) -> Self {
        Self {
            metar_cache_url: metar_cache_url.into(),
            taf_cache_url: taf_cache_url.into(),
            api_root_url: api_root_url.into(),
            http: Client::new(),
        }
    }

    /// Download, decompress, and parse one bulk snapshot document.
    async fn snapshot(&self, url: &str) -> Result<SnapshotData, Error> {
        let compressed = download(&self.http, url).await?;
        let xml = ungzip(&compressed)?;
        parse_snapshot(&xml)
    }

    /// Compose `{api_root}/{endpoint}?format=json&ids={station}`.
    fn station_url(&self, endpoint: Endpoint, station: &str) -> Result<Url, Error> {
        let base = format!("{}/{}", self.api_root_url, endpoint.as_str());
        let mut url = Url::parse(&base).map_err(|e| Error::Url {
            url: base,
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("ids", station);
        Ok(url)
    }
}

impl Default for NwsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    data: SnapshotData,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotData {
    #[serde(rename = "METAR", default)]
    metars: Vec<Report>,
    #[serde(rename = "TAF", default)]
    tafs: Vec<Report>,
}

#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    station_id: String,
    #[serde(default)]
    raw_text: String,
}

#[derive(Debug, Deserialize)]
struct ApiMetar {
    #[serde(rename = "icaoId", default)]
    icao_id: String,
    #[serde(rename = "rawOb", default)]
    raw_ob: String,
}

#[derive(Debug, Deserialize)]
struct ApiTaf {
    #[serde(rename = "icaoId", default)]
    icao_id: String,
    #[serde(rename = "rawTAF", default)]
    raw_taf: String,
}

#[async_trait]
impl WeatherProvider for NwsProvider {
    async fn update(&self) -> Result<(StationMap, StationMap)> {
        let snapshot = self
            .snapshot(&self.metar_cache_url)
            .await
            .context("failed to process metars")?;
        let metars = index_by_station(snapshot.metars);

        let snapshot = self
            .snapshot(&self.taf_cache_url)
            .await
            .context("failed to process tafs")?;
        let tafs = index_by_station(snapshot.tafs);

        info!(metars = metars.len(), tafs = tafs.len(), "snapshot refresh complete");
        Ok((metars, tafs))
    }

    async fn get_metar(&self, station: &str) -> Result<String> {
        let url = self
            .station_url(Endpoint::Metar, station)
            .context("failed to build metar url")?;
        let body = download(&self.http, url.as_str())
            .await
            .context("failed to download metar")?;
        let report: ApiMetar = first_report(&body, station).context("failed to decode metar")?;

        debug!(station = %report.icao_id, "fetched metar");
        Ok(report.raw_ob)
    }

    async fn get_taf(&self, station: &str) -> Result<String> {
        let url = self
            .station_url(Endpoint::Taf, station)
            .context("failed to build taf url")?;
        let body = download(&self.http, url.as_str())
            .await
            .context("failed to download taf")?;
        let report: ApiTaf = first_report(&body, station).context("failed to decode taf")?;

        debug!(station = %report.icao_id, "fetched taf");
        Ok(report.raw_taf)
    }
}

/// Data API endpoint selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Metar,
    Taf,
}

impl Endpoint {
    fn as_str(self) -> &'static str {
        match self {
            Endpoint::Metar => "metar",
            Endpoint::Taf => "taf",
        }
    }
}

/// GET `url` and return the full response body.
///
/// A single attempt: transport failures and non-200 statuses are terminal
/// for this call.
async fn download(http: &Client, url: &str) -> Result<Vec<u8>, Error> {
    let res = http
        .get(url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|source| Error::Transport { url: url.to_string(), source })?;

    let status = res.status();
    if status != StatusCode::OK {
        return Err(Error::Status { url: url.to_string(), status });
    }

    let body = res
        .bytes()
        .await
        .map_err(|source| Error::Transport { url: url.to_string(), source })?;

    debug!(url = %url, bytes = body.len(), "download complete");
    Ok(body.to_vec())
}

fn ungzip(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(Error::Decompress)?;
    Ok(out)
}

fn parse_snapshot(xml: &[u8]) -> Result<SnapshotData, Error> {
    let snapshot: Snapshot = serde_xml_rs::from_reader(xml)?;
    Ok(snapshot.data)
}

/// Index reports by station ID; later duplicates overwrite earlier ones.
fn index_by_station(reports: Vec<Report>) -> StationMap {
    let mut map = StationMap::with_capacity(reports.len());
    for report in reports {
        map.insert(report.station_id, report.raw_text);
    }
    map
}

/// First element of a JSON report array, or `NoData` for the station.
fn first_report<T: DeserializeOwned>(body: &[u8], station: &str) -> Result<T, Error> {
    let reports: Vec<T> = serde_json::from_slice(body)?;
    reports.into_iter().next().ok_or_else(|| Error::NoData {
        station: station.to_string(),
    })
}
