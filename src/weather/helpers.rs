use crate::context::ApiContext;
use crate::errors::RetrievalError;
use crate::helpers::http::{jitter, with_segments};
use crate::store::{self, Action, Dispatch, Operation};
use crate::types::{required, Coordinates, WeatherApiConfig, WeatherUrlStyle};
use crate::weather::{WeatherSnapshot, WEATHER_API_LIMIT};

use serde_json::Value;
use tracing::instrument;
use url::Url;

pub fn weather_url(
    config: &WeatherApiConfig,
    coordinates: Coordinates,
) -> Result<Url, RetrievalError> {
    let key = required(&config.api_key, "weather.api_key")?.to_string();
    let coordinates = coordinates.to_string();

    let segments = match config.url_style {
        WeatherUrlStyle::DuplicatedKey => vec![key.clone(), key, coordinates],
        WeatherUrlStyle::Forecast => vec![key, coordinates],
    };

    Ok(with_segments(&config.base_url, &segments)?)
}

/// The weather payload is handed on untouched
pub fn extract_weather(coordinates: Coordinates, body: Value) -> WeatherSnapshot {
    WeatherSnapshot {
        coordinates,
        payload: body,
    }
}

#[instrument(name = "fetch-weather", skip(api, coordinates), fields(coordinates = %coordinates))]
pub async fn fetch_weather(
    api: &ApiContext,
    coordinates: Coordinates,
) -> Result<WeatherSnapshot, RetrievalError> {
    let url = weather_url(&api.config().weather, coordinates)?;
    tracing::trace!(url = %api.redact(&url), "Requesting forecast");

    WEATHER_API_LIMIT.until_ready_with_jitter(jitter()).await;
    let body = api.http().get_json(&url).await?;

    Ok(extract_weather(coordinates, body))
}

pub async fn retrieve_weather(
    api: &ApiContext,
    coordinates: Coordinates,
    dispatch: &dyn Dispatch,
) -> Result<WeatherSnapshot, RetrievalError> {
    store::settle(
        dispatch,
        Operation::Weather,
        fetch_weather(api, coordinates).await,
        Action::WeatherRetrieved,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ConfigError;
    use crate::helpers::http::mock::MockFetch;
    use crate::store::recorder::RecordingDispatch;
    use crate::types::Config;
    use crate::weather::CurrentConditions;
    use serde_json::json;
    use std::sync::Arc;

    fn config(style: WeatherUrlStyle) -> WeatherApiConfig {
        WeatherApiConfig {
            base_url: "https://api.darksky.net/forecast/".to_string(),
            api_key: Some("abc123".to_string()),
            url_style: style,
        }
    }

    #[test]
    fn test_weather_url_templates() {
        let coords = Coordinates::new(39.7392, -104.9903).unwrap();

        assert_eq!(
            "https://api.darksky.net/forecast/abc123/abc123/39.7392,-104.9903",
            weather_url(&config(WeatherUrlStyle::DuplicatedKey), coords)
                .unwrap()
                .as_str()
        );
        assert_eq!(
            "https://api.darksky.net/forecast/abc123/39.7392,-104.9903",
            weather_url(&config(WeatherUrlStyle::Forecast), coords)
                .unwrap()
                .as_str()
        );
    }

    #[test]
    fn test_weather_url_requires_key() {
        let coords = Coordinates::new(0.5, 0.5).unwrap();
        let result = weather_url(&WeatherApiConfig::default(), coords);
        assert!(matches!(
            result,
            Err(RetrievalError::Config(ConfigError::Missing("weather.api_key")))
        ));
    }

    #[test]
    fn test_weather_url_encodes_key() {
        let mut config = config(WeatherUrlStyle::Forecast);
        config.api_key = Some("a/b?c".to_string());
        let url = weather_url(&config, Coordinates::new(1.0, 2.0).unwrap()).unwrap();
        assert_eq!("https://api.darksky.net/forecast/a%2Fb%3Fc/1,2", url.as_str());
    }

    #[test]
    fn test_redact_key_in_path() {
        let mut full = Config::default();
        full.weather = config(WeatherUrlStyle::DuplicatedKey);
        let url = weather_url(&full.weather, Coordinates::new(1.0, 2.0).unwrap()).unwrap();
        let api = ApiContext::new(Arc::new(MockFetch::default()), full);

        assert_eq!("https://api.darksky.net/forecast/***/***/1,2", api.redact(&url));
    }

    #[test]
    fn test_extract_weather_passes_payload_through() {
        let coords = Coordinates::new(39.7392, -104.9903).unwrap();
        let body = json!({
            "timezone": "America/Denver",
            "currently": {
                "time": 1493640000,
                "summary": "Partly Cloudy",
                "temperature": 61.3,
                "windSpeed": "7.2",
                "precipProbability": 0.1
            },
            "daily": {"data": []}
        });

        let snapshot = extract_weather(coords, body.clone());
        assert_eq!(body, snapshot.payload);
        assert_eq!(Some("America/Denver"), snapshot.timezone());

        let current = snapshot.current();
        assert_eq!(Some("Partly Cloudy"), current.summary.as_deref());
        assert_eq!(Some(61.3), current.temperature);
        assert_eq!(Some(7.2), current.wind_speed);
        assert_eq!(None, current.humidity);
        assert_eq!(
            Some("2017-05-01T12:00:00+00:00".to_string()),
            current.observed_at().map(|t| t.to_rfc3339())
        );
    }

    #[test]
    fn test_current_conditions_missing() {
        let snapshot = extract_weather(Coordinates::new(1.0, 1.0).unwrap(), json!({"flags": {}}));
        assert_eq!(CurrentConditions::default(), snapshot.current());

        let snapshot = extract_weather(Coordinates::new(1.0, 1.0).unwrap(), json!({"currently": 3}));
        assert_eq!(CurrentConditions::default(), snapshot.current());
    }

    #[tokio::test]
    async fn test_retrieve_weather() {
        let mut config = Config::default();
        config.weather.api_key = Some("abc123".to_string());
        let http = MockFetch::default().with_json(
            "https://api.darksky.net/forecast/abc123/abc123/39.5,-105",
            json!({"currently": {"summary": "Clear"}}),
        );
        let api = ApiContext::new(Arc::new(http), config);
        let recorder = RecordingDispatch::default();

        let coords = Coordinates::new(39.5, -105.0).unwrap();
        let snapshot = retrieve_weather(&api, coords, &recorder).await.unwrap();

        assert_eq!(Some("Clear"), snapshot.current().summary.as_deref());
        assert_eq!(vec![Action::WeatherRetrieved(snapshot)], recorder.actions());
    }
}
