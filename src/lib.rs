//! Retrieval and normalization of fishing reports, weather and movie data.
//!
//! Every retrieval comes as a pair: a `fetch_*` function returning the
//! normalized value and a `retrieve_*` action creator that additionally
//! reports the outcome to a [`store::Dispatch`].

pub mod context;
pub mod errors;
pub mod fishing;
pub mod helpers;
pub mod movies;
pub mod state;
pub mod store;
pub mod types;
pub mod weather;
pub mod youtube;

pub use context::ApiContext;
