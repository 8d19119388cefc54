use crate::errors::{ConfigError, CoordinatesError};
use crate::helpers::fs::create_dir;

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

pub const APPLICATION_NAME: &str = "reel-report";
const CONFIG_FILE: &str = "config.yaml";

/// WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fishing: FishingApiConfig,
    pub weather: WeatherApiConfig,
    pub tmdb: TmdbApiConfig,
    pub youtube: YoutubeApiConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingApiConfig {
    /// Location of the fishing report feed
    pub report_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, StrumDisplay, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WeatherUrlStyle {
    /// `{base}/{key}/{key}/{lat},{lon}`, the template the mobile app shipped with
    #[default]
    DuplicatedKey,
    /// `{base}/{key}/{lat},{lon}`
    Forecast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub url_style: WeatherUrlStyle,
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.darksky.net/forecast".to_string(),
            api_key: None,
            url_style: WeatherUrlStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbApiConfig {
    pub base_url: String,
    pub image_url: String,
    pub api_key: Option<String>,
}

impl Default for TmdbApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_url: "https://image.tmdb.org/t/p".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Maximum number of video lookups in flight at once
    pub concurrency: usize,
}

impl Default for YoutubeApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3/videos".to_string(),
            api_key: None,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout, the HTTP client default applies when unset
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: format!("{}/{}", APPLICATION_NAME, env!("CARGO_PKG_VERSION")),
        }
    }
}

pub(crate) fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APPLICATION_NAME).join(CONFIG_FILE))
            .ok_or(ConfigError::ConfigDir)
    }

    /// Load the configuration from `path` or the default location.
    ///
    /// A missing file at the default location yields the default configuration,
    /// an explicitly requested file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !explicit && std::fs::metadata(&path).is_err() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        Self::parse(&std::fs::read_to_string(&path)?)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(contents)?)
    }

    /// Every configured API key, for masking in errors and logs
    pub fn secrets(&self) -> Vec<String> {
        [
            &self.weather.api_key,
            &self.tmdb.api_key,
            &self.youtube.api_key,
        ]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        std::fs::write(path, serde_yml::to_string(self)?)?;
        Ok(())
    }
}
