//! Sleeper API access: wire types, the paced HTTP client, and scoring.

pub mod compute;
pub mod http;
pub mod pacer;
pub mod types;

pub use compute::{compute_points, ReceptionFormat};
pub use http::{Endpoints, SleeperClient, TrendingKind};
pub use pacer::RequestPacer;
