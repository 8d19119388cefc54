use crate::helpers::lenient;
use crate::types::Coordinates;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weather payload for a position, exactly as the provider returned it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub coordinates: Coordinates,
    pub payload: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(deserialize_with = "lenient::count")]
    pub time: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub apparent_temperature: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub wind_bearing: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub precip_probability: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub pressure: Option<f64>,
}

impl CurrentConditions {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.time
            .and_then(|ts| i64::try_from(ts).ok())
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

impl WeatherSnapshot {
    /// Typed view of the `currently` block; unknown or missing values stay `None`
    pub fn current(&self) -> CurrentConditions {
        self.payload
            .get("currently")
            .and_then(|v| CurrentConditions::deserialize(v).ok())
            .unwrap_or_default()
    }

    pub fn timezone(&self) -> Option<&str> {
        self.payload.get("timezone").and_then(Value::as_str)
    }
}
