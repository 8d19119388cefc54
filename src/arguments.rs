use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use reel_report::errors::ConfigError;
use reel_report::types::Config;
use std::path::PathBuf;
use strum::Display;

#[derive(Parser, Debug)]
#[command(author, version, about, name = "Reel Report")]
pub struct Cli {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Path to the configuration file
    #[arg(short, long, value_hint = ValueHint::FilePath, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.to_owned()),
            None => Config::default_path(),
        }
    }

    pub fn load_config(&self) -> Result<Config, ConfigError> {
        Config::load(self.config.as_deref())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fishing reports and waterbody details
    Fishing {
        #[command(subcommand)]
        command: FishingCommands,
    },
    /// Current weather for a position
    Weather {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Movie or TV show details including trailers
    Movie(MovieOptions),
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FishingCommands {
    /// List the current fishing report for every waterbody
    Reports(ReportOptions),
    /// Show the extended record of a single waterbody
    Waterbody {
        /// Detail link from the report feed, absolute or relative to the feed
        url: String,
        /// Also look up the current weather at the waterbody
        #[arg(long)]
        weather: bool,
    },
}

#[derive(Args, Debug)]
pub struct ReportOptions {
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
    /// Write the reports to a file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// Refresh the reports every SECS seconds until interrupted
    #[arg(short, long, value_name = "SECS")]
    pub watch: Option<u64>,
}

#[derive(Args, Debug)]
pub struct MovieOptions {
    /// TMDB identifier
    pub id: u64,
    /// Look up a TV show instead of a movie
    #[arg(long)]
    pub tv: bool,
    /// Skip the YouTube trailer lookups
    #[arg(long)]
    pub no_trailers: bool,
    /// Also list similar movies, starting at PAGE
    #[arg(long, value_name = "PAGE", conflicts_with = "tv")]
    pub similar: Option<u32>,
    /// Print the share sheet content
    #[arg(long)]
    pub share: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[derive(ValueEnum, Display, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
