use crate::helpers::lenient;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// TMDB API v3 movie and tv detail, with `images`, `videos` and the credits
/// appended to the response
/// @see https://developer.themoviedb.org/reference/movie-details
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct DetailsDocument {
    #[serde(deserialize_with = "lenient::count")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub original_title: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub original_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub overview: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub tagline: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub homepage: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub poster_path: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub genres: Vec<NamedEntry>,
    #[serde(deserialize_with = "lenient::count")]
    pub runtime: Option<u64>,
    #[serde(deserialize_with = "lenient::list")]
    pub episode_run_time: Vec<Value>,
    #[serde(deserialize_with = "lenient::date")]
    pub release_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::date")]
    pub first_air_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::date")]
    pub last_air_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::number")]
    pub vote_average: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub vote_count: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub budget: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub revenue: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub number_of_seasons: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub number_of_episodes: Option<u64>,
    #[serde(deserialize_with = "lenient::list")]
    pub production_companies: Vec<NamedEntry>,
    #[serde(deserialize_with = "lenient::list")]
    pub networks: Vec<NamedEntry>,
    #[serde(deserialize_with = "lenient::list")]
    pub created_by: Vec<NamedEntry>,
    pub images: Option<ImagesBlock>,
    /// Movies append `casts`, shows append `credits`
    #[serde(alias = "credits")]
    pub casts: Option<CreditsBlock>,
    pub videos: Option<VideosBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct NamedEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct ImagesBlock {
    #[serde(deserialize_with = "lenient::list")]
    pub backdrops: Vec<ImageEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct ImageEntry {
    #[serde(deserialize_with = "lenient::optional_text")]
    pub file_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct CreditsBlock {
    #[serde(deserialize_with = "lenient::list")]
    pub cast: Vec<CastEntry>,
    #[serde(deserialize_with = "lenient::list")]
    pub crew: Vec<CrewEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct CastEntry {
    #[serde(deserialize_with = "lenient::count")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub character: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub profile_path: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub order: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct CrewEntry {
    #[serde(deserialize_with = "lenient::count")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub job: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct VideosBlock {
    #[serde(deserialize_with = "lenient::list")]
    pub results: Vec<VideoEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct VideoEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub key: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub site: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient::optional_text")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct ResultsPage {
    #[serde(deserialize_with = "lenient::count")]
    pub page: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_pages: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_results: Option<u64>,
    #[serde(deserialize_with = "lenient::list")]
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::movies) struct ResultEntry {
    #[serde(deserialize_with = "lenient::count")]
    pub id: Option<u64>,
    #[serde(alias = "name", deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub poster_path: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub vote_average: Option<f64>,
    #[serde(alias = "first_air_date", deserialize_with = "lenient::date")]
    pub release_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::text")]
    pub overview: String,
}
