use governor::clock::QuantaClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use once_cell::sync::Lazy;

mod helpers;
pub(crate) mod types;

pub use helpers::*;
pub use types::*;

static FISHING_API_LIMIT: Lazy<RateLimiter<NotKeyed, InMemoryState, QuantaClock>> =
    Lazy::new(|| RateLimiter::direct(Quota::per_second(nonzero!(2u32))));
