use anyhow::anyhow;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use reel_report::state::{Phase, ViewState};

pub mod config;
pub mod fishing;
pub mod movies;
pub mod weather;

/// Data of a settled view, or the reason it failed
pub(crate) fn settled<T>(view: &ViewState<T>) -> anyhow::Result<&T> {
    match view.phase() {
        Phase::Ready { data, .. } => Ok(data),
        Phase::Failed { error } => Err(anyhow!(error.clone())),
        Phase::Idle | Phase::Loading => Err(anyhow!("Retrieval has not completed")),
    }
}

pub(crate) fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset("││──╞═╪╡┆    ┬┴┌┐└┘")
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

/// Two column table for a single record, rows without a value are skipped
pub(crate) fn record<'a>(rows: impl IntoIterator<Item = (&'a str, Option<String>)>) -> Table {
    let mut table = table(&["Field", "Value"]);
    for (field, value) in rows {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
        }
    }
    table
}

/// Shorten long free text for table cells
pub(crate) fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}…", cut.trim_end())
}
