//! Upstream clients: Blizzard Game Data API, Wowhead scrape fallback, and
//! the shared rate limiter.

pub mod blizzard;
pub mod rate_limit;
pub mod wowhead;

pub use blizzard::{BlizzardClient, Credentials, SetProvider};
pub use rate_limit::RateLimiter;
pub use wowhead::WowheadClient;
