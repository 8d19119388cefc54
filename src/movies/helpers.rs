use crate::context::ApiContext;
use crate::errors::{ExtractError, RetrievalError};
use crate::helpers::http::{jitter, with_segments};
use crate::helpers::text::plain_text;
use crate::movies::types::{DetailsDocument, NamedEntry, ResultEntry, ResultsPage};
use crate::movies::{
    CastMember, CrewMember, MediaInfo, MediaType, MovieDetails, MovieList, MovieSummary,
    VideoRef, TMDB_API_LIMIT,
};
use crate::store::{self, Action, Dispatch, Operation};
use crate::types::required;

use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

fn names(entries: Vec<NamedEntry>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn into_details(media_type: MediaType, doc: DetailsDocument) -> MovieDetails {
    let title = doc
        .original_title
        .or(doc.original_name)
        .or(doc.title)
        .or(doc.name)
        .unwrap_or_default();

    let info = match media_type {
        MediaType::Movie => MediaInfo::Movie {
            runtime_minutes: doc.runtime,
            budget: doc.budget.filter(|v| *v > 0),
            revenue: doc.revenue.filter(|v| *v > 0),
            production_companies: names(doc.production_companies),
        },
        MediaType::Tv => MediaInfo::Tv {
            episode_runtime_minutes: doc.episode_run_time.iter().find_map(Value::as_u64),
            seasons: doc.number_of_seasons,
            episodes: doc.number_of_episodes,
            last_air_date: doc.last_air_date,
            networks: names(doc.networks),
            created_by: names(doc.created_by),
        },
    };

    let credits = doc.casts.unwrap_or_default();
    let cast = credits
        .cast
        .into_iter()
        .sorted_by_key(|member| member.order.unwrap_or(u64::MAX))
        .map(|member| CastMember {
            id: member.id,
            name: member.name,
            character: member.character,
            profile_path: member.profile_path,
        })
        .collect();
    let crew = credits
        .crew
        .into_iter()
        .map(|member| CrewMember {
            id: member.id,
            name: member.name,
            job: member.job,
            department: member.department,
        })
        .collect();

    let backdrops = doc
        .images
        .map(|images| {
            images
                .backdrops
                .into_iter()
                .filter_map(|image| image.file_path)
                .collect()
        })
        .unwrap_or_default();

    let videos = doc
        .videos
        .map(|videos| {
            videos
                .results
                .into_iter()
                .filter(|video| !video.key.trim().is_empty())
                .map(|video| VideoRef {
                    key: video.key.trim().to_string(),
                    name: video.name,
                    site: video.site,
                    kind: video.kind,
                })
                .collect()
        })
        .unwrap_or_default();

    MovieDetails {
        media_type,
        id: doc.id.unwrap_or_default(),
        title,
        overview: plain_text(&doc.overview),
        tagline: doc.tagline,
        homepage: doc.homepage,
        poster_path: doc.poster_path,
        status: doc.status,
        genres: names(doc.genres),
        backdrops,
        cast,
        crew,
        videos,
        release_date: match media_type {
            MediaType::Movie => doc.release_date,
            MediaType::Tv => doc.first_air_date,
        },
        vote_average: doc.vote_average,
        vote_count: doc.vote_count,
        info,
    }
}

impl From<ResultEntry> for MovieSummary {
    fn from(entry: ResultEntry) -> Self {
        Self {
            id: entry.id.unwrap_or_default(),
            title: entry.title,
            poster_path: entry.poster_path,
            vote_average: entry.vote_average,
            release_date: entry.release_date,
            overview: plain_text(&entry.overview),
        }
    }
}

pub fn extract_movie_details(
    media_type: MediaType,
    body: &Value,
) -> Result<MovieDetails, ExtractError> {
    DetailsDocument::deserialize(body)
        .map(|doc| into_details(media_type, doc))
        .map_err(|source| ExtractError::Shape {
            what: "movie details",
            source,
        })
}

pub fn extract_similar_movies(body: &Value) -> Result<MovieList, ExtractError> {
    let page = ResultsPage::deserialize(body).map_err(|source| ExtractError::Shape {
        what: "similar movies",
        source,
    })?;

    let items: Vec<MovieSummary> = page
        .results
        .into_iter()
        .filter(|entry| entry.id.is_some())
        .map(MovieSummary::from)
        .collect();

    Ok(MovieList {
        page: page.page.unwrap_or(1),
        total_pages: page.total_pages.unwrap_or(1),
        total_results: page.total_results.unwrap_or(items.len() as u64),
        items,
    })
}

fn tmdb_url(
    api: &ApiContext,
    path: &[String],
    query: &[(&str, &str)],
) -> Result<Url, RetrievalError> {
    let tmdb = &api.config().tmdb;
    let key = required(&tmdb.api_key, "tmdb.api_key")?;

    let mut url = with_segments(&tmdb.base_url, path)?;
    url.query_pairs_mut()
        .append_pair("api_key", key)
        .extend_pairs(query);
    Ok(url)
}

pub fn movie_details_url(
    api: &ApiContext,
    media_type: MediaType,
    id: u64,
) -> Result<Url, RetrievalError> {
    let append = format!("{},images,videos", media_type.credits_block());
    tmdb_url(
        api,
        &[media_type.to_string(), id.to_string()],
        &[("append_to_response", append.as_str())],
    )
}

#[instrument(name = "fetch-movie-details", skip(api))]
pub async fn fetch_movie_details(
    api: &ApiContext,
    media_type: MediaType,
    id: u64,
) -> Result<MovieDetails, RetrievalError> {
    let url = movie_details_url(api, media_type, id)?;
    tracing::trace!(url = %api.redact(&url), "Looking up title");

    TMDB_API_LIMIT.until_ready_with_jitter(jitter()).await;
    let body = api.http().get_json(&url).await?;
    let mut details = extract_movie_details(media_type, &body)?;
    if details.id == 0 {
        details.id = id;
    }
    tracing::debug!(title = %details.title, videos = details.videos.len(), "Retrieved title");

    Ok(details)
}

pub async fn retrieve_movie_details(
    api: &ApiContext,
    media_type: MediaType,
    id: u64,
    dispatch: &dyn Dispatch,
) -> Result<MovieDetails, RetrievalError> {
    store::settle(
        dispatch,
        Operation::MovieDetails,
        fetch_movie_details(api, media_type, id).await,
        Action::MovieDetailsRetrieved,
    )
}

#[instrument(name = "fetch-similar-movies", skip(api))]
pub async fn fetch_similar_movies(
    api: &ApiContext,
    id: u64,
    page: u32,
) -> Result<MovieList, RetrievalError> {
    let page = page.max(1).to_string();
    let url = tmdb_url(
        api,
        &[MediaType::Movie.to_string(), id.to_string(), "similar".to_string()],
        &[("page", page.as_str())],
    )?;

    TMDB_API_LIMIT.until_ready_with_jitter(jitter()).await;
    let body = api.http().get_json(&url).await?;

    Ok(extract_similar_movies(&body)?)
}

pub async fn retrieve_similar_movies(
    api: &ApiContext,
    id: u64,
    page: u32,
    dispatch: &dyn Dispatch,
) -> Result<MovieList, RetrievalError> {
    store::settle(
        dispatch,
        Operation::SimilarMovies,
        fetch_similar_movies(api, id, page).await,
        Action::SimilarMoviesRetrieved,
    )
}
