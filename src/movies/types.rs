mod api;
mod models;

pub(in crate::movies) use api::*;
pub use models::*;
