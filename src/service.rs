use crate::{
    model::{StationMap, Weather},
    provider::WeatherProvider,
};

/// Facade over a [`WeatherProvider`].
///
/// Call sites depend on this type rather than a concrete provider, so an
/// alternate weather source can be swapped in without touching them.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Refresh the bulk snapshots. See [`WeatherProvider::update`].
    pub async fn update(&self) -> anyhow::Result<(StationMap, StationMap)> {
        self.provider.update().await
    }

    /// Latest raw METAR for a single station.
    pub async fn get_metar(&self, station: &str) -> anyhow::Result<String> {
        self.provider.get_metar(station).await
    }

    /// Latest raw TAF for a single station.
    pub async fn get_taf(&self, station: &str) -> anyhow::Result<String> {
        self.provider.get_taf(station).await
    }

    /// Current observation and forecast for one station, as a pair.
    pub async fn report(&self, station: &str) -> anyhow::Result<Weather> {
        Ok(Weather {
            metar: self.provider.get_metar(station).await?,
            taf: self.provider.get_taf(station).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StubProvider;

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn update(&self) -> anyhow::Result<(StationMap, StationMap)> {
            let metars = StationMap::from([("PAFA".to_string(), "metar text".to_string())]);
            let tafs = StationMap::from([("PAFA".to_string(), "taf text".to_string())]);
            Ok((metars, tafs))
        }

        async fn get_metar(&self, station: &str) -> anyhow::Result<String> {
            if station == "PAFA" {
                Ok("metar text".to_string())
            } else {
                anyhow::bail!("unknown station {station}")
            }
        }

        async fn get_taf(&self, station: &str) -> anyhow::Result<String> {
            if station == "PAFA" {
                Ok("taf text".to_string())
            } else {
                anyhow::bail!("unknown station {station}")
            }
        }
    }

    fn service() -> WeatherService {
        WeatherService::new(Box::new(StubProvider))
    }

    #[tokio::test]
    async fn update_passes_through() {
        let (metars, tafs) = service().update().await.unwrap();
        assert_eq!(metars["PAFA"], "metar text");
        assert_eq!(tafs["PAFA"], "taf text");
    }

    #[tokio::test]
    async fn lookups_pass_through() {
        let svc = service();
        assert_eq!(svc.get_metar("PAFA").await.unwrap(), "metar text");
        assert_eq!(svc.get_taf("PAFA").await.unwrap(), "taf text");
    }

    #[tokio::test]
    async fn report_pairs_metar_and_taf() {
        let weather = service().report("PAFA").await.unwrap();
        assert_eq!(weather.metar, "metar text");
        assert_eq!(weather.taf, "taf text");
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let err = service().get_metar("XXXX").await.unwrap_err();
        assert!(err.to_string().contains("unknown station"));
    }
}
