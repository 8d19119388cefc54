use crate::context::ApiContext;
use crate::errors::{ExtractError, FetchError, RetrievalError};
use crate::fishing::types::{
    ReportEntry, ReportFeed, ReportField, SpeciesEntry, WaterbodyDocument,
};
use crate::fishing::{Stocking, WaterbodyDetail, WaterbodySummary, FISHING_API_LIMIT};
use crate::helpers::http::{jitter, parse_url};
use crate::helpers::text::plain_text;
use crate::store::{self, Action, Dispatch, Operation};
use crate::types::{required, Coordinates};

use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

fn location(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinates> {
    match (latitude, longitude) {
        // Placeholder the feed uses for unmapped waters
        (Some(lat), Some(lon)) if lat == 0.0 && lon == 0.0 => None,
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
        _ => None,
    }
}

/// Feed names are frequently all caps: "ANTERO RESERVOIR"
fn display_name(name: &str) -> String {
    let name = name.split_whitespace().join(" ");
    if name.chars().any(char::is_lowercase) {
        return name;
    }

    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .join(" ")
}

impl From<ReportEntry> for WaterbodySummary {
    fn from(entry: ReportEntry) -> Self {
        Self {
            id: entry.id,
            name: display_name(&entry.name),
            location: location(entry.latitude, entry.longitude),
            report: plain_text(&entry.report),
            report_date: entry.report_date,
            detail_url: entry.detail_url,
        }
    }
}

impl From<WaterbodyDocument> for WaterbodyDetail {
    fn from(doc: WaterbodyDocument) -> Self {
        let (report, report_date, conditions) = match doc.report {
            Some(ReportField::Text(text)) => (plain_text(&text), None, None),
            Some(ReportField::Record(record)) => {
                (plain_text(&record.text), record.date, record.conditions)
            }
            Some(ReportField::Other(_)) | None => (String::new(), None, None),
        };

        let species = doc
            .species
            .into_iter()
            .filter_map(|entry| match entry {
                SpeciesEntry::Name(name) => Some(name),
                SpeciesEntry::Record(record) => Some(record.name),
                SpeciesEntry::Other(_) => None,
            })
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unique()
            .collect();

        let stockings = doc
            .stocking
            .into_iter()
            .map(|entry| Stocking {
                date: entry.date,
                species: entry.species.trim().to_string(),
                count: entry.count,
            })
            // Undated entries go last
            .sorted_by(|a, b| b.date.cmp(&a.date))
            .collect();

        Self {
            id: doc.id,
            name: display_name(&doc.name),
            location: location(doc.latitude, doc.longitude),
            county: doc.county,
            elevation_ft: doc.elevation_ft,
            surface_acres: doc.surface_acres,
            species,
            report,
            report_date,
            conditions,
            stockings,
            regulations: doc.regulations.map(|v| plain_text(&v)),
        }
    }
}

/// Normalize a fishing report feed into one summary per entry, in feed order
pub fn extract_fishing_report(body: &Value) -> Result<Vec<WaterbodySummary>, ExtractError> {
    let shape = |source| ExtractError::Shape {
        what: "fishing report",
        source,
    };

    let entries = match body {
        Value::Array(_) => Vec::<ReportEntry>::deserialize(body).map_err(shape)?,
        _ => ReportFeed::deserialize(body).map_err(shape)?.waterbodies,
    };

    Ok(entries.into_iter().map(WaterbodySummary::from).collect())
}

pub fn extract_waterbody(body: &Value) -> Result<WaterbodyDetail, ExtractError> {
    WaterbodyDocument::deserialize(body)
        .map(WaterbodyDetail::from)
        .map_err(|source| ExtractError::Shape {
            what: "waterbody",
            source,
        })
}

fn report_url(api: &ApiContext) -> Result<Url, RetrievalError> {
    let url = required(&api.config().fishing.report_url, "fishing.report_url")?;
    Ok(parse_url(url)?)
}

/// Detail links in the feed may be relative to the feed itself
pub fn resolve_detail_url(api: &ApiContext, link: &str) -> Result<Url, RetrievalError> {
    match Url::parse(link) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = report_url(api)?;
            base.join(link).map_err(|source| {
                FetchError::InvalidUrl {
                    url: link.to_string(),
                    source,
                }
                .into()
            })
        }
        Err(source) => Err(FetchError::InvalidUrl {
            url: link.to_string(),
            source,
        }
        .into()),
    }
}

#[instrument(name = "fetch-fishing-reports", skip_all)]
pub async fn fetch_fishing_reports(
    api: &ApiContext,
) -> Result<Vec<WaterbodySummary>, RetrievalError> {
    let url = report_url(api)?;

    FISHING_API_LIMIT.until_ready_with_jitter(jitter()).await;
    let body = api.http().get_json(&url).await?;
    let waterbodies = extract_fishing_report(&body)?;
    tracing::debug!(count = waterbodies.len(), "Retrieved fishing reports");

    Ok(waterbodies)
}

pub async fn retrieve_fishing_reports(
    api: &ApiContext,
    dispatch: &dyn Dispatch,
) -> Result<Vec<WaterbodySummary>, RetrievalError> {
    store::settle(
        dispatch,
        Operation::FishingReports,
        fetch_fishing_reports(api).await,
        Action::FishingReportsRetrieved,
    )
}

#[instrument(name = "fetch-waterbody", skip(api))]
pub async fn fetch_waterbody(api: &ApiContext, link: &str) -> Result<WaterbodyDetail, RetrievalError> {
    let url = resolve_detail_url(api, link)?;
    tracing::trace!(url = %api.redact(&url), "Looking up waterbody");

    FISHING_API_LIMIT.until_ready_with_jitter(jitter()).await;
    let body = api.http().get_json(&url).await?;

    Ok(extract_waterbody(&body)?)
}

pub async fn retrieve_waterbody(
    api: &ApiContext,
    link: &str,
    dispatch: &dyn Dispatch,
) -> Result<WaterbodyDetail, RetrievalError> {
    store::settle(
        dispatch,
        Operation::Waterbody,
        fetch_waterbody(api, link).await,
        Action::WaterbodyRetrieved,
    )
}
