//! Core services shared by every operation
//!
//! - `cache`: period-scoped read-through cache for matchups, rosters and projections
//! - `identity`: hint → account/league/roster resolution
//! - `players`: process-lifetime player catalog

pub mod cache;
pub mod identity;
pub mod players;

pub use cache::{CacheStats, PeriodCache};
pub use identity::{IdentityResolver, Resolution};
pub use players::PlayerDirectory;
