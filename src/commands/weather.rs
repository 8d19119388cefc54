use crate::commands::{record, settled};
use reel_report::helpers::progress::{step, CLOUD};
use reel_report::state::{ViewScope, ViewState};
use reel_report::store::{Operation, Store};
use reel_report::types::Coordinates;
use reel_report::weather::{self, WeatherSnapshot};
use reel_report::ApiContext;

pub(crate) fn print_conditions(snapshot: &WeatherSnapshot) {
    let current = snapshot.current();
    let rows = [
        ("Position", Some(snapshot.coordinates.to_string())),
        ("Timezone", snapshot.timezone().map(str::to_string)),
        ("Observed", current.observed_at().map(|t| t.to_rfc3339())),
        ("Summary", current.summary.clone()),
        ("Temperature", current.temperature.map(|v| format!("{v:.1}°"))),
        ("Feels like", current.apparent_temperature.map(|v| format!("{v:.1}°"))),
        ("Wind", current.wind_speed.map(|v| match current.wind_bearing {
            Some(bearing) => format!("{v:.1} from {bearing:.0}°"),
            None => format!("{v:.1}"),
        })),
        ("Precipitation", current.precip_probability.map(|v| format!("{:.0}%", v * 100.0))),
        ("Humidity", current.humidity.map(|v| format!("{:.0}%", v * 100.0))),
        ("Pressure", current.pressure.map(|v| format!("{v:.1} hPa"))),
    ];
    println!("{}", record(rows));
}

pub(crate) async fn current(
    api: &ApiContext,
    shutdown: &ViewScope,
    coordinates: Coordinates,
) -> anyhow::Result<()> {
    let store = Store::new();
    let mut view = ViewState::new();

    step(1, 1, CLOUD, "Retrieving weather...");
    let ticket = view.mount();
    let retrieval = weather::retrieve_weather(api, coordinates, &store);
    view.complete(ticket, shutdown.try_run(Operation::Weather, retrieval).await);
    print_conditions(settled(&view)?);

    Ok(())
}
