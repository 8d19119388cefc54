use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    /// Name of the credits block the detail endpoint appends for this type
    pub(crate) fn credits_block(&self) -> &'static str {
        match self {
            MediaType::Movie => "casts",
            MediaType::Tv => "credits",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub key: String,
    pub name: String,
    pub site: Option<String>,
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: Option<u64>,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: Option<u64>,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaInfo {
    Movie {
        runtime_minutes: Option<u64>,
        budget: Option<u64>,
        revenue: Option<u64>,
        production_companies: Vec<String>,
    },
    Tv {
        episode_runtime_minutes: Option<u64>,
        seasons: Option<u64>,
        episodes: Option<u64>,
        last_air_date: Option<NaiveDate>,
        networks: Vec<String>,
        created_by: Vec<String>,
    },
}

impl Default for MediaInfo {
    fn default() -> Self {
        MediaInfo::Movie {
            runtime_minutes: None,
            budget: None,
            revenue: None,
            production_companies: vec![],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub media_type: MediaType,
    pub id: u64,
    /// Original title for movies, original name for shows
    pub title: String,
    pub overview: String,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub poster_path: Option<String>,
    pub status: Option<String>,
    pub genres: Vec<String>,
    pub backdrops: Vec<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub videos: Vec<VideoRef>,
    /// Release date for movies, first air date for shows
    pub release_date: Option<NaiveDate>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub info: MediaInfo,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShareContent {
    pub title: String,
    pub message: String,
    pub url: String,
    pub subject: String,
}

impl MovieDetails {
    pub fn genre_line(&self) -> String {
        self.genres.join(", ")
    }

    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| image_url(image_base, "w185", path))
    }

    pub fn backdrop_urls(&self, image_base: &str) -> Vec<String> {
        self.backdrops
            .iter()
            .map(|path| image_url(image_base, "w780", path))
            .collect()
    }

    pub fn directors(&self) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|member| member.job.as_deref() == Some("Director"))
            .map(|member| member.name.as_str())
            .collect()
    }

    /// Nothing to share without a homepage
    pub fn share_content(&self) -> Option<ShareContent> {
        self.homepage.as_ref().map(|url| ShareContent {
            title: self.title.clone(),
            message: self.overview.clone(),
            url: url.clone(),
            subject: "Share Link".to_string(),
        })
    }
}

pub fn image_url(image_base: &str, size: &str, path: &str) -> String {
    format!(
        "{}/{size}/{}",
        image_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub overview: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieList {
    pub page: u64,
    pub total_pages: u64,
    pub total_results: u64,
    pub items: Vec<MovieSummary>,
}

impl MovieList {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
