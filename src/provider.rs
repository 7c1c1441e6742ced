use crate::model::StationMap;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod nws;

/// Common contract for aviation weather sources.
///
/// Implementations are expected to be cheap to share (`Send + Sync`) and to
/// hold no mutable per-call state, so concurrent callers only depend on the
/// underlying HTTP client being safe for concurrent use.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Refresh the bulk snapshots, returning METARs and TAFs keyed by
    /// station. Fails as a whole; no partial maps are returned.
    async fn update(&self) -> anyhow::Result<(StationMap, StationMap)>;

    /// Latest raw METAR for a single station.
    async fn get_metar(&self, station: &str) -> anyhow::Result<String>;

    /// Latest raw TAF for a single station.
    async fn get_taf(&self, station: &str) -> anyhow::Result<String>;
}

/// Construct the default provider, pointed at the production
/// aviationweather.gov endpoints.
pub fn default_provider() -> Box<dyn WeatherProvider> {
    Box::new(nws::NwsProvider::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_nws() {
        let provider = default_provider();
        assert!(format!("{provider:?}").contains("NwsProvider"));
    }
}
