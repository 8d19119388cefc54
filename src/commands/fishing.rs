use crate::arguments::{OutputFormat, ReportOptions};
use crate::commands::weather::print_conditions;
use crate::commands::{excerpt, record, settled, table};
use comfy_table::Cell;
use reel_report::fishing::{self, WaterbodyDetail, WaterbodySummary};
use reel_report::helpers::fs::prepare_output_file;
use reel_report::helpers::progress::{step, CLOUD, FISH, REPEAT, WATER};
use reel_report::errors::RetrievalError;
use reel_report::state::{ViewScope, ViewState};
use reel_report::store::{Operation, Store};
use reel_report::weather;
use reel_report::ApiContext;
use std::fs::File;
use std::io::Write;
use std::time::Duration;

fn write_reports(
    waterbodies: &[WaterbodySummary],
    format: OutputFormat,
    mut writer: impl Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let mut table = table(&["Waterbody", "Date", "Location", "Report"]);
            for waterbody in waterbodies {
                table.add_row(vec![
                    Cell::new(&waterbody.name),
                    Cell::new(
                        waterbody
                            .report_date
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                    ),
                    Cell::new(
                        waterbody
                            .location
                            .map(|l| l.to_string())
                            .unwrap_or_default(),
                    ),
                    Cell::new(excerpt(&waterbody.report, 120)),
                ]);
            }
            writeln!(writer, "{table}")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, waterbodies)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            wtr.write_record([
                "id",
                "name",
                "latitude",
                "longitude",
                "report_date",
                "report",
                "detail_url",
            ])?;
            for waterbody in waterbodies {
                let (latitude, longitude) = waterbody
                    .location
                    .map(|l| (l.latitude.to_string(), l.longitude.to_string()))
                    .unwrap_or_default();
                wtr.write_record([
                    waterbody.id.clone(),
                    waterbody.name.clone(),
                    latitude,
                    longitude,
                    waterbody
                        .report_date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    waterbody.report.clone(),
                    waterbody.detail_url.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

fn render(view: &ViewState<Vec<WaterbodySummary>>, options: &ReportOptions) -> anyhow::Result<()> {
    let waterbodies = settled(view)?;
    if let Some(error) = view.last_error() {
        tracing::warn!("Refresh failed, showing previous reports: {error}");
    }

    match &options.output {
        Some(path) => {
            prepare_output_file(path)?;
            write_reports(waterbodies, options.format, File::create(path)?)?;
            tracing::info!(path = %path.display(), count = waterbodies.len(), "Wrote fishing reports");
        }
        None => write_reports(waterbodies, options.format, std::io::stdout().lock())?,
    }

    Ok(())
}

pub(crate) async fn reports(
    api: &ApiContext,
    shutdown: &ViewScope,
    options: &ReportOptions,
) -> anyhow::Result<()> {
    let store = Store::new();
    let mut view = ViewState::new();

    step(1, 1, FISH, "Retrieving fishing reports...");
    let ticket = view.mount();
    let retrieval = fishing::retrieve_fishing_reports(api, &store);
    view.complete(ticket, shutdown.try_run(Operation::FishingReports, retrieval).await);
    render(&view, options)?;

    let Some(secs) = options.watch else {
        return Ok(());
    };

    let mut interval = tokio::time::interval(Duration::from_secs(secs.max(1)));
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.torn_down() => break,
            _ = interval.tick() => {}
        }

        step(1, 1, REPEAT, "Refreshing fishing reports...");
        let ticket = view.refresh();
        let retrieval = fishing::retrieve_fishing_reports(api, &store);
        let result = shutdown.try_run(Operation::FishingReports, retrieval).await;
        if let Err(RetrievalError::Cancelled(_)) = result {
            break;
        }
        view.complete(ticket, result);
        render(&view, options)?;
    }

    Ok(())
}

fn print_waterbody(detail: &WaterbodyDetail) {
    let rows = [
        ("Name", Some(detail.name.clone())),
        ("County", detail.county.clone()),
        ("Location", detail.location.map(|l| l.to_string())),
        ("Elevation (ft)", detail.elevation_ft.map(|v| format!("{v:.0}"))),
        ("Surface (acres)", detail.surface_acres.map(|v| v.to_string())),
        ("Species", Some(detail.species.join(", "))),
        ("Conditions", detail.conditions.clone()),
        ("Report date", detail.report_date.map(|d| d.to_string())),
        ("Report", Some(detail.report.clone())),
        ("Regulations", detail.regulations.clone()),
    ];
    println!("{}", record(rows));

    if !detail.stockings.is_empty() {
        let mut table = table(&["Stocked", "Species", "Count"]);
        for stocking in &detail.stockings {
            table.add_row(vec![
                Cell::new(stocking.date.map(|d| d.to_string()).unwrap_or_default()),
                Cell::new(&stocking.species),
                Cell::new(stocking.count.map(|c| c.to_string()).unwrap_or_default()),
            ]);
        }
        println!("{table}");
    }
}

pub(crate) async fn waterbody(
    api: &ApiContext,
    shutdown: &ViewScope,
    link: &str,
    with_weather: bool,
) -> anyhow::Result<()> {
    let store = Store::new();
    let total = if with_weather { 2 } else { 1 };

    step(1, total, WATER, "Retrieving waterbody...");
    let mut view = ViewState::new();
    let ticket = view.mount();
    let retrieval = fishing::retrieve_waterbody(api, link, &store);
    view.complete(ticket, shutdown.try_run(Operation::Waterbody, retrieval).await);
    let detail = settled(&view)?;
    print_waterbody(detail);

    if !with_weather {
        return Ok(());
    }

    let Some(location) = detail.location else {
        tracing::warn!(waterbody = %detail.name, "No location on record, skipping weather");
        return Ok(());
    };

    step(2, total, CLOUD, "Retrieving weather...");
    let retrieval = weather::retrieve_weather(api, location, &store);
    let snapshot = shutdown.try_run(Operation::Weather, retrieval).await?;
    print_conditions(&snapshot);

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use reel_report::errors::FetchError;
    use reel_report::helpers::http::Fetch;
    use reel_report::types::{Config, Coordinates};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use url::Url;

    /// Serves an empty feed and counts the requests
    #[derive(Default)]
    struct EmptyFeed {
        requests: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Fetch for EmptyFeed {
        async fn get_json(&self, _url: &Url) -> Result<Value, FetchError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"waterbodies": []}))
        }
    }

    fn waterbodies() -> Vec<WaterbodySummary> {
        vec![WaterbodySummary {
            id: "1234".to_string(),
            name: "Antero Reservoir".to_string(),
            location: Coordinates::new(38.9958, -105.8922).ok(),
            report: "Ice is off, trout are hitting worms.".to_string(),
            ..Default::default()
        }]
    }

    #[test]
    fn test_write_reports_csv() {
        let mut out = Vec::new();
        write_reports(&waterbodies(), OutputFormat::Csv, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!("id,name,latitude,longitude,report_date,report,detail_url", lines[0]);
        assert_eq!(
            "1234,Antero Reservoir,38.9958,-105.8922,,\"Ice is off, trout are hitting worms.\",",
            lines[1]
        );
    }

    #[test]
    fn test_write_reports_json() {
        let mut out = Vec::new();
        write_reports(&waterbodies(), OutputFormat::Json, &mut out).unwrap();

        let parsed: Vec<WaterbodySummary> = serde_json::from_slice(&out).unwrap();
        assert_eq!(waterbodies(), parsed);
    }

    #[tokio::test]
    async fn test_watch_stops_on_shutdown() {
        let feed = Arc::new(EmptyFeed::default());
        let mut config = Config::default();
        config.fishing.report_url = Some("https://reports.example.org/feed.json".to_string());
        let api = ApiContext::new(feed.clone(), config);

        let output = std::env::temp_dir().join(format!("reel-report-watch-{}.json", std::process::id()));
        let options = ReportOptions {
            format: OutputFormat::Json,
            output: Some(output.clone()),
            watch: Some(60),
        };

        // The signal arrives while the loop waits for the next tick
        let shutdown = ViewScope::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            signal.teardown();
        });

        tokio::time::timeout(Duration::from_secs(5), reports(&api, &shutdown, &options))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(1, feed.requests.load(Ordering::SeqCst));
        std::fs::remove_file(output).unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_cancels_waterbody() {
        let api = ApiContext::new(Arc::new(EmptyFeed::default()), Config::default());
        let shutdown = ViewScope::new();
        shutdown.teardown();

        let result = waterbody(&api, &shutdown, "https://reports.example.org/1.json", false).await;
        assert!(result.unwrap_err().to_string().contains("cancelled"));
    }
}
