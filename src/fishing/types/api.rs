use crate::helpers::lenient;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Report feed as published by the provider. Some mirrors serve the bare
/// list of entries instead of the wrapping document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::fishing) struct ReportFeed {
    #[serde(deserialize_with = "lenient::date")]
    pub updated: Option<NaiveDate>,
    #[serde(alias = "reports", deserialize_with = "lenient::list")]
    pub waterbodies: Vec<ReportEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::fishing) struct ReportEntry {
    #[serde(deserialize_with = "lenient::id_string")]
    pub id: String,
    #[serde(alias = "title", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(alias = "lat", deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(alias = "lng", alias = "lon", deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,
    #[serde(alias = "fishing_report", deserialize_with = "lenient::text")]
    pub report: String,
    #[serde(alias = "date", deserialize_with = "lenient::date")]
    pub report_date: Option<NaiveDate>,
    #[serde(alias = "url", deserialize_with = "lenient::optional_text")]
    pub detail_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::fishing) struct WaterbodyDocument {
    #[serde(deserialize_with = "lenient::id_string")]
    pub id: String,
    #[serde(alias = "title", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(alias = "lat", deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(alias = "lng", alias = "lon", deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub county: Option<String>,
    #[serde(alias = "elevation", deserialize_with = "lenient::number")]
    pub elevation_ft: Option<f64>,
    #[serde(alias = "acres", deserialize_with = "lenient::number")]
    pub surface_acres: Option<f64>,
    #[serde(alias = "fish_species", deserialize_with = "lenient::list")]
    pub species: Vec<SpeciesEntry>,
    pub report: Option<ReportField>,
    #[serde(alias = "stockings", deserialize_with = "lenient::list")]
    pub stocking: Vec<StockingEntry>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub regulations: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(in crate::fishing) enum SpeciesEntry {
    Name(String),
    Record(SpeciesRecord),
    Other(IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::fishing) struct SpeciesRecord {
    #[serde(alias = "common_name", deserialize_with = "lenient::text")]
    pub name: String,
}

/// Older documents carry the report as a plain string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(in crate::fishing) enum ReportField {
    Text(String),
    Record(ReportRecord),
    Other(IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::fishing) struct ReportRecord {
    #[serde(alias = "body", deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub conditions: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::fishing) struct StockingEntry {
    #[serde(deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::text")]
    pub species: String,
    #[serde(alias = "quantity", deserialize_with = "lenient::count")]
    pub count: Option<u64>,
}
