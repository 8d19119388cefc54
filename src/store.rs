//! Typed outcome events and the read model they update.
//!
//! Action creators report exactly one event per retrieval (one per video for
//! the trailer fan-out). The reducer is pure; [`Store`] applies it under a lock.

use crate::errors::RetrievalError;
use crate::fishing::{WaterbodyDetail, WaterbodySummary};
use crate::movies::{MovieDetails, MovieList};
use crate::weather::WeatherSnapshot;
use crate::youtube::VideoSnippet;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
    FishingReports,
    Waterbody,
    Weather,
    MovieDetails,
    SimilarMovies,
    VideoDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FishingReportsRetrieved(Vec<WaterbodySummary>),
    WaterbodyRetrieved(WaterbodyDetail),
    WeatherRetrieved(WeatherSnapshot),
    MovieDetailsRetrieved(MovieDetails),
    SimilarMoviesRetrieved(MovieList),
    TrailerRetrieved(VideoSnippet),
    RetrievalFailed { operation: Operation, reason: String },
}

impl Action {
    pub fn operation(&self) -> Operation {
        match self {
            Action::FishingReportsRetrieved(_) => Operation::FishingReports,
            Action::WaterbodyRetrieved(_) => Operation::Waterbody,
            Action::WeatherRetrieved(_) => Operation::Weather,
            Action::MovieDetailsRetrieved(_) => Operation::MovieDetails,
            Action::SimilarMoviesRetrieved(_) => Operation::SimilarMovies,
            Action::TrailerRetrieved(_) => Operation::VideoDetails,
            Action::RetrievalFailed { operation, .. } => *operation,
        }
    }
}

pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}

impl Dispatch for tokio::sync::mpsc::UnboundedSender<Action> {
    fn dispatch(&self, action: Action) {
        if let Err(e) = self.send(action) {
            tracing::debug!(operation = %e.0.operation(), "Receiver is gone, dropping action");
        }
    }
}

/// Report the outcome of a retrieval and hand it back to the caller
pub(crate) fn settle<T: Clone>(
    dispatch: &dyn Dispatch,
    operation: Operation,
    result: Result<T, RetrievalError>,
    success: impl FnOnce(T) -> Action,
) -> Result<T, RetrievalError> {
    match result {
        Ok(value) => {
            dispatch.dispatch(success(value.clone()));
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(operation = %operation, "Retrieval failed: {e}");
            dispatch.dispatch(Action::RetrievalFailed {
                operation,
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub fishing_reports: Vec<WaterbodySummary>,
    pub waterbody: Option<WaterbodyDetail>,
    pub weather: Option<WeatherSnapshot>,
    pub movie_details: Option<MovieDetails>,
    pub similar_movies: Option<MovieList>,
    /// Trailer metadata in arrival order
    pub trailers: Vec<VideoSnippet>,
    /// Most recent failure reason per operation, cleared by the next success
    pub failures: HashMap<Operation, String>,
}

pub fn reduce(mut state: AppState, action: Action) -> AppState {
    let operation = action.operation();
    match action {
        Action::RetrievalFailed { operation, reason } => {
            state.failures.insert(operation, reason);
            return state;
        }
        Action::FishingReportsRetrieved(waterbodies) => state.fishing_reports = waterbodies,
        Action::WaterbodyRetrieved(detail) => state.waterbody = Some(detail),
        Action::WeatherRetrieved(weather) => state.weather = Some(weather),
        Action::MovieDetailsRetrieved(details) => {
            // A different title starts with an empty trailer list
            if state.movie_details.as_ref().map(|d| (d.media_type, d.id))
                != Some((details.media_type, details.id))
            {
                state.trailers.clear();
            }
            state.movie_details = Some(details);
        }
        Action::SimilarMoviesRetrieved(list) => state.similar_movies = Some(list),
        Action::TrailerRetrieved(snippet) => state.trailers.push(snippet),
    }
    state.failures.remove(&operation);
    state
}

#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<AppState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AppState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: Action) {
        tracing::trace!(operation = %action.operation(), "Applying action");
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = reduce(std::mem::take(&mut *guard), action);
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::movies::MediaType;

    fn waterbody(name: &str) -> WaterbodySummary {
        WaterbodySummary {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn snippet(key: &str) -> VideoSnippet {
        VideoSnippet {
            key: key.to_string(),
            ..Default::default()
        }
    }

    fn movie(id: u64) -> MovieDetails {
        MovieDetails {
            id,
            media_type: MediaType::Movie,
            ..Default::default()
        }
    }

    #[test]
    fn test_failure_is_recorded_and_cleared_by_success() {
        let state = reduce(
            AppState::default(),
            Action::RetrievalFailed {
                operation: Operation::FishingReports,
                reason: "Server responded with status 500".to_string(),
            },
        );
        assert!(state.fishing_reports.is_empty());
        assert!(state.failures.contains_key(&Operation::FishingReports));

        let state = reduce(
            state,
            Action::FishingReportsRetrieved(vec![waterbody("Antero Reservoir")]),
        );
        assert_eq!(1, state.fishing_reports.len());
        assert!(state.failures.is_empty());
    }

    #[test]
    fn test_trailers_append_in_arrival_order() {
        let state = [snippet("b"), snippet("a"), snippet("b")]
            .into_iter()
            .fold(AppState::default(), |state, s| {
                reduce(state, Action::TrailerRetrieved(s))
            });

        let keys: Vec<_> = state.trailers.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(vec!["b", "a", "b"], keys);
    }

    #[test]
    fn test_new_title_resets_trailers() {
        let state = reduce(AppState::default(), Action::MovieDetailsRetrieved(movie(1)));
        let state = reduce(state, Action::TrailerRetrieved(snippet("a")));

        // Same title again, e.g. a refresh
        let state = reduce(state, Action::MovieDetailsRetrieved(movie(1)));
        assert_eq!(1, state.trailers.len());

        let state = reduce(state, Action::MovieDetailsRetrieved(movie(2)));
        assert!(state.trailers.is_empty());
    }

    #[test]
    fn test_store_applies_actions() {
        let store = Store::new();
        store.dispatch(Action::TrailerRetrieved(snippet("a")));
        store.dispatch(Action::TrailerRetrieved(snippet("b")));
        assert_eq!(2, store.snapshot().trailers.len());

        // A different title starts a fresh trailer list
        store.dispatch(Action::MovieDetailsRetrieved(movie(2)));
        assert!(store.snapshot().trailers.is_empty());
    }

    #[tokio::test]
    async fn test_channel_dispatch() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.dispatch(Action::TrailerRetrieved(snippet("a")));
        drop(tx);

        assert_eq!(Some(Action::TrailerRetrieved(snippet("a"))), rx.recv().await);
        assert_eq!(None, rx.recv().await);
    }
}
