use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw report text keyed by ICAO station identifier.
///
/// When a snapshot carries the same station more than once, the later
/// record in document order wins.
pub type StationMap = HashMap<String, String>;

/// Current observation and forecast for a single station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    pub metar: String,
    pub taf: String,
}
