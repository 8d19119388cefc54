mod api;
mod models;

pub(in crate::fishing) use api::*;
pub use models::*;
