use crate::types::Coordinates;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterbodySummary {
    pub id: String,
    pub name: String,
    pub location: Option<Coordinates>,
    /// Plain text fishing report
    pub report: String,
    pub report_date: Option<NaiveDate>,
    /// Where the extended waterbody record can be retrieved from
    pub detail_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterbodyDetail {
    pub id: String,
    pub name: String,
    pub location: Option<Coordinates>,
    pub county: Option<String>,
    pub elevation_ft: Option<f64>,
    pub surface_acres: Option<f64>,
    pub species: Vec<String>,
    pub report: String,
    pub report_date: Option<NaiveDate>,
    /// Provider rating of the current fishing conditions, e.g. "Good"
    pub conditions: Option<String>,
    /// Most recent stocking first
    pub stockings: Vec<Stocking>,
    pub regulations: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stocking {
    pub date: Option<NaiveDate>,
    pub species: String,
    pub count: Option<u64>,
}
