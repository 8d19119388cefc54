use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressState, ProgressStyle};
use std::time::Duration;
use tracing::Level;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod arguments;
mod commands;

use arguments::{Cli, Commands, ConfigCommands, FishingCommands};
use reel_report::helpers::progress;
use reel_report::state::ViewScope;
use reel_report::types::Coordinates;
use reel_report::ApiContext;

fn setup_logging(verbose: u8) -> Result<()> {
    let log_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let indicatif_layer = IndicatifLayer::new()
        .with_progress_style(
            ProgressStyle::with_template(
                "{color_start}{span_child_prefix}{span_fields} -- {span_name} {wide_msg} {elapsed_subsec}{color_end}",
            )?
            .with_key("elapsed_subsec", progress::elapsed_subsec)
            .with_key(
                "color_start",
                |state: &ProgressState, writer: &mut dyn std::fmt::Write| {
                    let elapsed = state.elapsed();

                    if elapsed > Duration::from_secs(8) {
                        // Red
                        let _ = write!(writer, "\x1b[{}m", 1 + 30);
                    } else if elapsed > Duration::from_secs(4) {
                        // Yellow
                        let _ = write!(writer, "\x1b[{}m", 3 + 30);
                    }
                },
            )
            .with_key(
                "color_end",
                |state: &ProgressState, writer: &mut dyn std::fmt::Write| {
                    if state.elapsed() > Duration::from_secs(4) {
                        let _ = write!(writer, "\x1b[0m");
                    }
                },
            ),
        )
        .with_span_child_prefix_symbol("↳ ")
        .with_span_child_prefix_indent(" ")
        .with_max_progress_bars(
            8,
            Some(ProgressStyle::with_template(
                "...and {pending_progress_bars} more not shown above.",
            )?),
        );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(indicatif_layer.get_stderr_writer())
                .with_filter(Targets::default().with_default(Level::TRACE)),
        )
        .with(indicatif_layer)
        .with(
            Targets::default()
                .with_target("reel_report", log_level)
                .with_target("reqwest", LevelFilter::OFF)
                .with_target("hyper", LevelFilter::OFF),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.verbose)?;

    if let Commands::Config { command } = &args.command {
        return match command {
            ConfigCommands::Init { force } => commands::config::init(&args.config_path()?, *force),
            ConfigCommands::Show => commands::config::show(&args.load_config()?),
        };
    }

    let api = ApiContext::from_config(args.load_config()?)?;

    // One Ctrl-C listener for the whole run, every retrieval races against it
    let shutdown = ViewScope::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling pending retrievals");
                shutdown.teardown();
            }
        });
    }

    match &args.command {
        Commands::Fishing { command } => match command {
            FishingCommands::Reports(options) => {
                commands::fishing::reports(&api, &shutdown, options).await?
            }
            FishingCommands::Waterbody { url, weather } => {
                commands::fishing::waterbody(&api, &shutdown, url, *weather).await?
            }
        },
        Commands::Weather {
            latitude,
            longitude,
        } => {
            let coordinates = Coordinates::new(*latitude, *longitude)?;
            commands::weather::current(&api, &shutdown, coordinates).await?
        }
        Commands::Movie(options) => commands::movies::details(&api, &shutdown, options).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
